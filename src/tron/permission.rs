//! Permission values.
//!
//! A [`Permission`] is immutable once built. The constructors here are the only way to
//! get one outside the crate, and each runs the validation for its layer, so holding a
//! `Permission` means holding a well-formed one. Changes go through
//! [`crate::AccountPermissions`], which swaps whole values.

use std::collections::HashSet;

use candid::CandidType;
use serde::Serialize;

use crate::permission_error::{PermissionError, Result};
use super::operations::{build_operations_for, decode_operations, OPERATIONS_LEN};
use super::contract_type::ContractType;
use super::types::{KeyJson, PermissionJson, PermissionType};
use super::utils::{bytes_to_base58, parse_address, AddressBytes};
use super::validation::{
    validate_active_permission_id, validate_active_permission_operations,
    validate_keys_and_threshold, validate_permission_name,
};

/// Owner permission id
pub const OWNER_PERMISSION_ID: i32 = 0;

/// Witness permission id
pub const WITNESS_PERMISSION_ID: i32 = 1;

/// A signer and its weight
#[derive(Debug, Clone, PartialEq, Eq, Hash, CandidType, Serialize)]
pub struct Key {
    address: Vec<u8>,
    weight: i64,
}

impl Key {
    pub fn new(address: AddressBytes, weight: i64) -> Self {
        Self { address: address.to_vec(), weight }
    }

    /// Raw 21-byte address
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    /// Base58Check form of the address
    pub fn base58_address(&self) -> String {
        bytes_to_base58(&self.address)
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    fn to_json(&self, visible: bool) -> KeyJson {
        KeyJson {
            address: if visible { self.base58_address() } else { hex::encode(&self.address) },
            weight: self.weight,
        }
    }
}

/// One permission record of an account
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Serialize)]
pub struct Permission {
    permission_type: PermissionType,
    id: i32,
    name: String,
    threshold: i64,
    parent_id: i32,
    keys: Vec<Key>,
    operations: Vec<u8>,
}

fn key_refs(keys: &[Key]) -> impl Iterator<Item = (&[u8], i64)> {
    keys.iter().map(|k| (k.address(), k.weight()))
}

impl Permission {
    /// Build the owner permission (id 0)
    pub fn owner(name: &str, threshold: i64, keys: Vec<Key>) -> Result<Self> {
        validate_permission_name(name)?;
        validate_keys_and_threshold(key_refs(&keys), threshold)?;
        Ok(Self::from_parts(
            PermissionType::Owner,
            OWNER_PERMISSION_ID,
            name,
            threshold,
            keys,
            Vec::new(),
        ))
    }

    /// Build the witness permission (id 1)
    pub fn witness(name: &str, threshold: i64, keys: Vec<Key>) -> Result<Self> {
        validate_permission_name(name)?;
        validate_keys_and_threshold(key_refs(&keys), threshold)?;
        Ok(Self::from_parts(
            PermissionType::Witness,
            WITNESS_PERMISSION_ID,
            name,
            threshold,
            keys,
            Vec::new(),
        ))
    }

    /// Build an active permission (id >= 2) scoped to `operations`
    pub fn active(
        name: &str,
        id: i32,
        threshold: i64,
        operations: &[u8],
        keys: Vec<Key>,
    ) -> Result<Self> {
        validate_permission_name(name)?;
        validate_active_permission_id(id)?;
        validate_keys_and_threshold(key_refs(&keys), threshold)?;
        validate_active_permission_operations(operations)?;
        Ok(Self::from_parts(PermissionType::Active, id, name, threshold, keys, operations.to_vec()))
    }

    fn from_parts(
        permission_type: PermissionType,
        id: i32,
        name: &str,
        threshold: i64,
        keys: Vec<Key>,
        operations: Vec<u8>,
    ) -> Self {
        Self {
            permission_type,
            id,
            name: name.to_string(),
            threshold,
            parent_id: 0,
            keys,
            operations,
        }
    }

    /// Copy of this permission with its operations mask replaced
    pub(crate) fn with_operations(&self, operations: [u8; OPERATIONS_LEN]) -> Self {
        Self { operations: operations.to_vec(), ..self.clone() }
    }

    /// Copy of an on-chain permission
    ///
    /// Addresses are parsed and the mask is hex-decoded, then the value goes through the
    /// constructor for its type, so chain state obeys the same rules as local values. The
    /// owner must carry id 0 and the witness id 1.
    pub fn from_json(json: &PermissionJson) -> Result<Self> {
        let keys = json
            .keys
            .iter()
            .map(|k| Ok(Key::new(parse_address(&k.address)?, k.weight)))
            .collect::<Result<Vec<_>>>()?;

        let operations = match &json.operations {
            Some(hex_operations) if !hex_operations.is_empty() => {
                let operations = hex::decode(hex_operations).map_err(|e| {
                    PermissionError::SerializationError(format!("Invalid operations hex: {}", e))
                })?;
                if operations.len() != OPERATIONS_LEN {
                    return Err(PermissionError::InvalidWireFormat(operations.len()));
                }
                operations
            }
            _ => Vec::new(),
        };

        let name = &json.permission_name;
        let permission = match json.permission_type {
            PermissionType::Owner if json.id == OWNER_PERMISSION_ID => {
                Self::owner(name, json.threshold, keys)?
            }
            PermissionType::Witness if json.id == WITNESS_PERMISSION_ID => {
                Self::witness(name, json.threshold, keys)?
            }
            PermissionType::Owner | PermissionType::Witness => {
                return Err(PermissionError::InvalidPermissionId(json.id));
            }
            PermissionType::Active => {
                Self::active(name, json.id, json.threshold, &operations, keys)?
            }
        };
        Ok(Self { parent_id: json.parent_id, ..permission })
    }

    /// TronGrid JSON form; addresses in Base58 when `visible`, hex otherwise
    pub fn to_json(&self, visible: bool) -> PermissionJson {
        PermissionJson {
            permission_type: self.permission_type,
            id: self.id,
            permission_name: self.name.clone(),
            threshold: self.threshold,
            parent_id: self.parent_id,
            operations: if self.operations.is_empty() {
                None
            } else {
                Some(hex::encode(&self.operations))
            },
            keys: self.keys.iter().map(|k| k.to_json(visible)).collect(),
        }
    }

    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn parent_id(&self) -> i32 {
        self.parent_id
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Raw operations mask; empty for owner and witness permissions
    pub fn operations(&self) -> &[u8] {
        &self.operations
    }

    /// Contract types this permission may authorize
    ///
    /// Owner and witness permissions carry no mask and yield an empty list.
    pub fn contract_types(&self) -> Result<Vec<ContractType>> {
        if self.operations.is_empty() {
            return Ok(Vec::new());
        }
        decode_operations(&self.operations)
    }

    /// Whether this permission's mask enables `contract_type`
    pub fn allows(&self, contract_type: ContractType) -> bool {
        let id = contract_type.id() as usize;
        self.operations
            .get(id / 8)
            .map(|byte| (byte >> (id % 8)) & 0x1 == 1)
            .unwrap_or(false)
    }

    /// Total weight contributed by the given signer addresses
    ///
    /// Addresses that are not keys of this permission add nothing, and each key counts
    /// at most once.
    pub fn approved_weight<'a, I>(&self, signers: I) -> i128
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let signers: HashSet<&[u8]> = signers.into_iter().collect();
        self.keys
            .iter()
            .filter(|k| signers.contains(k.address()))
            .map(|k| i128::from(k.weight()))
            .sum()
    }

    /// Whether the given signers together reach the threshold
    pub fn is_satisfied_by<'a, I>(&self, signers: I) -> bool
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.approved_weight(signers) >= i128::from(self.threshold)
    }

    /// Operations mask with `contract_types` switched on or off
    pub(crate) fn switched_operations(
        &self,
        enable: bool,
        contract_types: &[ContractType],
    ) -> Result<[u8; OPERATIONS_LEN]> {
        build_operations_for(&self.operations, enable, contract_types)
    }
}
