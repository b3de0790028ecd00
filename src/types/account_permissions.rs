use candid::CandidType;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    permission_error::{PermissionError, Result},
    tron::{
        config::TronConfig,
        contract_type::ContractType,
        permission::{Key, Permission},
        permission_update::{AccountPermissionUpdateRequest, MAX_ACTIVE_PERMISSIONS},
        types::{Account, PermissionType, TronAddress},
        utils::{bytes_to_base58, parse_address},
        validation::{
            validate_active_permission_id, validate_active_permission_operations,
            validate_keys_and_threshold, validate_permission_name,
        },
    },
};

/// Default name of the owner permission
pub const DEFAULT_OWNER_PERMISSION_NAME: &str = "owner";

/// Default name of the witness permission
pub const DEFAULT_WITNESS_PERMISSION_NAME: &str = "witness";

/// Default name of an active permission
pub const DEFAULT_ACTIVE_PERMISSION_NAME: &str = "active";

/// Owner, witness and active permissions of one account
///
/// A local staging object: load it from chain state (or start empty), change it, then
/// turn it into an [`AccountPermissionUpdateRequest`]. Every mutation either applies
/// fully or leaves the value untouched.
///
/// Not synchronized; wrap it in a lock to share it between threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, CandidType)]
pub struct AccountPermissions {
    address: TronAddress,
    owner_permission: Option<Permission>,
    witness_permission: Option<Permission>,
    active_permissions: Vec<Permission>,
}

fn reject<T>(error: PermissionError) -> Result<T> {
    warn!(%error, "rejected permission change");
    Err(error)
}

impl AccountPermissions {
    /// Empty permission set for a (new) account
    pub fn new(address: &str) -> Result<Self> {
        let address_bytes = parse_address(address)?;
        Ok(Self {
            address: bytes_to_base58(&address_bytes),
            owner_permission: None,
            witness_permission: None,
            active_permissions: Vec::new(),
        })
    }

    /// Copy the permissions of an on-chain account
    ///
    /// Each slot is filled through its setter, so a permission of the wrong type or a
    /// repeated active id is rejected the same way a local change would be.
    pub fn from_account(account: &Account) -> Result<Self> {
        let mut permissions = Self::new(&account.address)?;
        if let Some(owner) = &account.owner_permission {
            permissions.set_owner_permission(Permission::from_json(owner)?)?;
        }
        let witness = account.witness_permission.as_ref().map(Permission::from_json).transpose()?;
        permissions.set_witness_permission(witness)?;

        let actives = account
            .active_permission
            .iter()
            .map(Permission::from_json)
            .collect::<Result<Vec<_>>>()?;
        if !actives.is_empty() {
            permissions.set_active_permissions(actives)?;
        }

        debug!(
            address = %permissions.address,
            actives = permissions.active_permissions.len(),
            "loaded account permissions"
        );
        Ok(permissions)
    }

    /// Base58 address of the account
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn owner_permission(&self) -> Option<&Permission> {
        self.owner_permission.as_ref()
    }

    /// Witness permission; `None` if the account is not a witness
    pub fn witness_permission(&self) -> Option<&Permission> {
        self.witness_permission.as_ref()
    }

    pub fn active_permissions(&self) -> &[Permission] {
        &self.active_permissions
    }

    /// Replace the owner permission; it can never be cleared
    pub fn set_owner_permission(
        &mut self,
        owner: impl Into<Option<Permission>>,
    ) -> Result<&mut Self> {
        let owner = match owner.into() {
            Some(owner) => owner,
            None => {
                return reject(PermissionError::InvalidArgument(
                    "owner permission cannot be empty".to_string(),
                ))
            }
        };
        if owner.permission_type() != PermissionType::Owner {
            return reject(PermissionError::InvalidArgument(
                "owner permission type must be Owner".to_string(),
            ));
        }

        debug!(
            address = %self.address,
            name = owner.name(),
            threshold = owner.threshold(),
            "set owner permission"
        );
        self.owner_permission = Some(owner);
        Ok(self)
    }

    /// Replace or clear (`None`) the witness permission
    pub fn set_witness_permission(
        &mut self,
        witness: impl Into<Option<Permission>>,
    ) -> Result<&mut Self> {
        let witness = witness.into();
        if let Some(witness) = &witness {
            if witness.permission_type() != PermissionType::Witness {
                return reject(PermissionError::InvalidArgument(
                    "witness permission type must be Witness".to_string(),
                ));
            }
        }

        debug!(address = %self.address, cleared = witness.is_none(), "set witness permission");
        self.witness_permission = witness;
        Ok(self)
    }

    /// Replace the whole active permission list
    pub fn set_active_permissions(&mut self, actives: Vec<Permission>) -> Result<&mut Self> {
        if actives.is_empty() {
            return reject(PermissionError::InvalidArgument(
                "active permission list is empty".to_string(),
            ));
        }
        for (i, active) in actives.iter().enumerate() {
            if let Err(error) = Self::check_active(active) {
                return reject(error);
            }
            if actives[..i].iter().any(|p| p.id() == active.id()) {
                return reject(PermissionError::DuplicateId(active.id()));
            }
        }

        debug!(address = %self.address, actives = actives.len(), "set active permissions");
        self.active_permissions = actives;
        Ok(self)
    }

    /// Append an active permission; its id must not be in use
    pub fn add_active_permission(
        &mut self,
        active: impl Into<Option<Permission>>,
    ) -> Result<&mut Self> {
        let active = match active.into() {
            Some(active) => active,
            None => {
                return reject(PermissionError::InvalidArgument(
                    "active permission is empty".to_string(),
                ))
            }
        };
        if let Err(error) = Self::check_active(&active) {
            return reject(error);
        }
        if self.active_permission(active.id()).is_some() {
            return reject(PermissionError::DuplicateId(active.id()));
        }

        debug!(
            address = %self.address,
            id = active.id(),
            name = active.name(),
            "added active permission"
        );
        self.active_permissions.push(active);
        Ok(self)
    }

    /// Remove the active permission with `permission_id`, if there is one
    pub fn remove_active_permission(&mut self, permission_id: i32) -> Result<&mut Self> {
        if let Err(error) = validate_active_permission_id(permission_id) {
            return reject(error);
        }

        let before = self.active_permissions.len();
        self.active_permissions.retain(|p| p.id() != permission_id);
        debug!(
            address = %self.address,
            id = permission_id,
            removed = (before != self.active_permissions.len()),
            "remove active permission"
        );
        Ok(self)
    }

    /// Active permission with `permission_id`, `None` if absent
    pub fn active_permission(&self, permission_id: i32) -> Option<&Permission> {
        self.active_permissions.iter().find(|p| p.id() == permission_id)
    }

    /// Allow `contract_types` under the active permission `permission_id`
    ///
    /// ```ignore
    /// permissions.enable_operations(
    ///     2,
    ///     &[ContractType::TransferContract, ContractType::TransferAssetContract],
    /// )?;
    /// ```
    pub fn enable_operations(
        &mut self,
        permission_id: i32,
        contract_types: &[ContractType],
    ) -> Result<&mut Self> {
        self.switch_operations(permission_id, true, contract_types)
    }

    /// Stop allowing `contract_types` under the active permission `permission_id`
    pub fn disable_operations(
        &mut self,
        permission_id: i32,
        contract_types: &[ContractType],
    ) -> Result<&mut Self> {
        self.switch_operations(permission_id, false, contract_types)
    }

    fn switch_operations(
        &mut self,
        permission_id: i32,
        enable: bool,
        contract_types: &[ContractType],
    ) -> Result<&mut Self> {
        if let Err(error) = validate_active_permission_id(permission_id) {
            return reject(error);
        }
        if contract_types.is_empty() {
            return reject(PermissionError::InvalidArgument(
                "contract types cannot be empty".to_string(),
            ));
        }

        let index = match self.active_permissions.iter().position(|p| p.id() == permission_id) {
            Some(index) => index,
            None => return reject(PermissionError::NotFound(permission_id)),
        };
        let switched = self.active_permissions[index].switched_operations(enable, contract_types);
        let operations = match switched {
            Ok(operations) => operations,
            Err(error) => return reject(error),
        };

        debug!(
            address = %self.address,
            id = permission_id,
            enable,
            count = contract_types.len(),
            "switched operations"
        );
        self.active_permissions[index] = self.active_permissions[index].with_operations(operations);
        Ok(self)
    }

    fn check_active(active: &Permission) -> Result<()> {
        if active.permission_type() != PermissionType::Active {
            return Err(PermissionError::InvalidArgument(
                "active permission type must be Active".to_string(),
            ));
        }
        validate_active_permission_id(active.id())
    }

    /// Build a signer key; the address may be Base58 or hex
    pub fn create_key(&self, address: &str, weight: i64) -> Result<Key> {
        let address_bytes = parse_address(address)
            .map_err(|_| {
                PermissionError::InvalidAddress(format!("Invalid key address: {}", address))
            })?;
        Ok(Key::new(address_bytes, weight))
    }

    /// Resolve an address → weight map into keys, checking the raw entries first
    ///
    /// Key order follows the map's iteration order.
    fn create_keys<I, S>(&self, keys: I, threshold: i64) -> Result<Vec<Key>>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let entries: Vec<(S, i64)> = keys.into_iter().collect();
        validate_keys_and_threshold(
            entries.iter().map(|(a, w)| (a.as_ref().as_bytes(), *w)),
            threshold,
        )?;
        entries
            .iter()
            .map(|(address, weight)| self.create_key(address.as_ref(), *weight))
            .collect()
    }

    /// Owner permission named "owner"
    pub fn create_owner_permission<I, S>(&self, threshold: i64, keys: I) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        self.create_named_owner_permission(DEFAULT_OWNER_PERMISSION_NAME, threshold, keys)
    }

    pub fn create_named_owner_permission<I, S>(
        &self,
        name: &str,
        threshold: i64,
        keys: I,
    ) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        validate_permission_name(name)?;
        let keys = self.create_keys(keys, threshold)?;
        Permission::owner(name, threshold, keys)
    }

    /// Witness permission named "witness"
    pub fn create_witness_permission<I, S>(&self, threshold: i64, keys: I) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        self.create_named_witness_permission(DEFAULT_WITNESS_PERMISSION_NAME, threshold, keys)
    }

    pub fn create_named_witness_permission<I, S>(
        &self,
        name: &str,
        threshold: i64,
        keys: I,
    ) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        validate_permission_name(name)?;
        let keys = self.create_keys(keys, threshold)?;
        Permission::witness(name, threshold, keys)
    }

    /// Active permission named "active"
    pub fn create_active_permission<I, S>(
        &self,
        permission_id: i32,
        threshold: i64,
        operations: &[u8],
        keys: I,
    ) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        self.create_named_active_permission(
            DEFAULT_ACTIVE_PERMISSION_NAME,
            permission_id,
            threshold,
            operations,
            keys,
        )
    }

    /// Active permission; `operations` is usually built with
    /// [`crate::tron::operations::build_operations`]
    pub fn create_named_active_permission<I, S>(
        &self,
        name: &str,
        permission_id: i32,
        threshold: i64,
        operations: &[u8],
        keys: I,
    ) -> Result<Permission>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        validate_permission_name(name)?;
        validate_active_permission_id(permission_id)?;
        let keys = self.create_keys(keys, threshold)?;
        validate_active_permission_operations(operations)?;
        Permission::active(name, permission_id, threshold, operations, keys)
    }

    /// Snapshot the permissions into an update request for this account
    ///
    /// The chain requires an owner and at least one active permission; both are checked
    /// here so a request that would be rejected on-chain is never built.
    pub fn build_update_request(
        &self,
        config: &TronConfig,
    ) -> Result<AccountPermissionUpdateRequest> {
        let owner = match &self.owner_permission {
            Some(owner) => owner,
            None => {
                return reject(PermissionError::InvalidArgument(
                    "owner permission is missing".to_string(),
                ))
            }
        };
        if self.active_permissions.is_empty() {
            return reject(PermissionError::InvalidArgument(
                "active permission is missing".to_string(),
            ));
        }
        if self.active_permissions.len() > MAX_ACTIVE_PERMISSIONS {
            return reject(PermissionError::TooManyActivePermissions(
                self.active_permissions.len(),
            ));
        }

        let owner_address = if config.visible {
            self.address.clone()
        } else {
            hex::encode(parse_address(&self.address)?)
        };

        let request = AccountPermissionUpdateRequest {
            owner_address,
            owner: owner.to_json(config.visible),
            witness: self.witness_permission.as_ref().map(|w| w.to_json(config.visible)),
            actives: self.active_permissions.iter().map(|a| a.to_json(config.visible)).collect(),
            visible: config.visible,
            permission_id: config.permission_id,
        };
        debug!(
            address = %self.address,
            actives = request.actives.len(),
            "built permission update request"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::tron::key_pair::KeyPair;
    use crate::tron::operations::{build_operations_for, decode_operations, NONE_OPERATIONS};
    use ContractType::*;

    fn address(seed: u8) -> String {
        KeyPair::from_private_key(&[seed; 32]).unwrap().address().to_string()
    }

    fn account() -> AccountPermissions {
        AccountPermissions::new(&address(100)).unwrap()
    }

    fn active_keys() -> HashMap<String, i64> {
        (1u8..=3).map(|seed| (address(seed), 1)).collect()
    }

    fn transfer_operations() -> [u8; 32] {
        build_operations_for(&[], true, &[TransferContract, TransferAssetContract]).unwrap()
    }

    #[test]
    fn test_set_owner_permission() {
        let mut permissions = account();
        assert!(permissions.owner_permission().is_none());

        let owner = permissions
            .create_named_owner_permission("testOwnerPermissionName", 1, [(address(100), 1)])
            .unwrap();
        permissions.set_owner_permission(owner).unwrap();

        let owner = permissions.owner_permission().unwrap();
        assert_eq!(owner.name(), "testOwnerPermissionName");
        assert_eq!(owner.permission_type(), PermissionType::Owner);
        assert_eq!(owner.id(), 0);
        assert_eq!(owner.threshold(), 1);
        assert_eq!(owner.keys().len(), 1);

        let before = permissions.clone();
        assert!(matches!(
            permissions.set_owner_permission(None),
            Err(PermissionError::InvalidArgument(_))
        ));
        let witness = permissions.create_witness_permission(1, [(address(100), 1)]).unwrap();
        assert!(matches!(
            permissions.set_owner_permission(witness),
            Err(PermissionError::InvalidArgument(_))
        ));
        assert_eq!(permissions, before);
    }

    #[test]
    fn test_set_witness_permission() {
        let mut permissions = account();
        assert!(permissions.witness_permission().is_none());

        let witness = permissions.create_witness_permission(1, [(address(100), 1)]).unwrap();
        permissions.set_witness_permission(witness).unwrap();
        let witness = permissions.witness_permission().unwrap();
        assert_eq!(witness.name(), "witness");
        assert_eq!(witness.permission_type(), PermissionType::Witness);
        assert_eq!(witness.id(), 1);

        permissions.set_witness_permission(None).unwrap();
        assert!(permissions.witness_permission().is_none());

        let owner = permissions.create_owner_permission(1, [(address(100), 1)]).unwrap();
        assert!(matches!(
            permissions.set_witness_permission(owner),
            Err(PermissionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_active_permission_list() {
        let mut permissions = account();
        assert!(permissions.active_permissions().is_empty());

        let active2 = permissions
            .create_named_active_permission("active2", 2, 2, &transfer_operations(), active_keys())
            .unwrap();
        permissions.set_active_permissions(vec![active2.clone()]).unwrap();
        assert_eq!(permissions.active_permissions(), &[active2.clone()]);
        assert_eq!(permissions.active_permissions()[0].keys().len(), 3);

        let active3 = permissions
            .create_named_active_permission("active3", 3, 2, &transfer_operations(), active_keys())
            .unwrap();
        permissions.add_active_permission(active3.clone()).unwrap();
        assert_eq!(permissions.active_permissions().len(), 2);
        assert_eq!(permissions.active_permissions()[1], active3);

        permissions.remove_active_permission(2).unwrap();
        assert_eq!(permissions.active_permissions().len(), 1);
        assert_eq!(permissions.active_permissions()[0].name(), "active3");

        // Unknown id is a no-op
        permissions.remove_active_permission(5).unwrap();
        assert_eq!(permissions.active_permissions().len(), 1);

        permissions.remove_active_permission(3).unwrap();
        assert!(permissions.active_permissions().is_empty());

        let active4 = permissions
            .create_active_permission(4, 2, &transfer_operations(), active_keys())
            .unwrap();
        permissions.add_active_permission(active4.clone()).unwrap();
        assert_eq!(permissions.active_permission(4), Some(&active4));
        assert_eq!(permissions.active_permission(2), None);
        assert_eq!(active4.name(), "active");
    }

    #[test]
    fn test_duplicate_active_ids_are_rejected() {
        let mut permissions = account();
        let first = permissions
            .create_named_active_permission("first", 2, 1, &transfer_operations(), active_keys())
            .unwrap();
        let second = permissions
            .create_named_active_permission("second", 2, 1, &NONE_OPERATIONS, active_keys())
            .unwrap();

        permissions.add_active_permission(first.clone()).unwrap();
        assert_eq!(
            permissions.add_active_permission(second.clone()).map(|_| ()),
            Err(PermissionError::DuplicateId(2))
        );
        assert_eq!(permissions.active_permissions(), &[first.clone()]);

        assert_eq!(
            permissions.set_active_permissions(vec![first.clone(), second]).map(|_| ()),
            Err(PermissionError::DuplicateId(2))
        );
        assert_eq!(permissions.active_permissions(), &[first]);
    }

    #[test]
    fn test_enable_disable_operations() {
        let mut permissions = account();
        let active = permissions
            .create_active_permission(4, 2, &transfer_operations(), active_keys())
            .unwrap();
        let other = permissions
            .create_named_active_permission("other", 5, 1, &NONE_OPERATIONS, active_keys())
            .unwrap();
        permissions.set_active_permissions(vec![active.clone(), other.clone()]).unwrap();

        permissions.enable_operations(4, &[AccountCreateContract]).unwrap();
        let updated = permissions.active_permission(4).unwrap();
        assert_eq!(
            decode_operations(updated.operations()).unwrap(),
            vec![AccountCreateContract, TransferContract, TransferAssetContract]
        );

        permissions.disable_operations(4, &[TransferContract]).unwrap();
        let updated = permissions.active_permission(4).unwrap();
        assert_eq!(
            decode_operations(updated.operations()).unwrap(),
            vec![AccountCreateContract, TransferAssetContract]
        );

        // Recover the original mask through chained calls
        permissions
            .enable_operations(4, &[TransferContract])
            .unwrap()
            .disable_operations(4, &[AccountCreateContract])
            .unwrap();
        assert_eq!(permissions.active_permission(4), Some(&active));

        // Order and untouched entries are preserved
        assert_eq!(permissions.active_permissions()[0].id(), 4);
        assert_eq!(permissions.active_permissions()[1], other);
    }

    #[test]
    fn test_enable_then_disable_yields_empty_mask() {
        let mut permissions = account();
        let active = permissions
            .create_active_permission(2, 1, &NONE_OPERATIONS, active_keys())
            .unwrap();
        permissions.add_active_permission(active).unwrap();

        permissions
            .enable_operations(2, &[TransferContract])
            .unwrap()
            .disable_operations(2, &[TransferContract])
            .unwrap();
        assert_eq!(permissions.active_permission(2).unwrap().operations(), &NONE_OPERATIONS[..]);
    }

    #[test]
    fn test_switch_operations_errors() {
        let mut permissions = account();
        assert_eq!(
            permissions.enable_operations(7, &[TransferContract]).map(|_| ()),
            Err(PermissionError::NotFound(7))
        );
        assert_eq!(
            permissions.disable_operations(1, &[TransferContract]).map(|_| ()),
            Err(PermissionError::InvalidPermissionId(1))
        );

        let active = permissions
            .create_active_permission(2, 1, &NONE_OPERATIONS, active_keys())
            .unwrap();
        permissions.add_active_permission(active).unwrap();
        assert!(matches!(
            permissions.enable_operations(2, &[]),
            Err(PermissionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_active_permission() {
        let mut permissions = account();

        assert!(matches!(
            permissions.set_active_permissions(vec![]),
            Err(PermissionError::InvalidArgument(_))
        ));
        assert!(matches!(
            permissions.add_active_permission(None),
            Err(PermissionError::InvalidArgument(_))
        ));

        let owner = permissions.create_owner_permission(1, active_keys()).unwrap();
        assert!(matches!(
            permissions.add_active_permission(owner.clone()),
            Err(PermissionError::InvalidArgument(_))
        ));
        assert!(matches!(
            permissions.set_active_permissions(vec![owner]),
            Err(PermissionError::InvalidArgument(_))
        ));

        assert_eq!(
            permissions.create_named_active_permission("invalidActive", 1, 2, &transfer_operations(), active_keys()),
            Err(PermissionError::InvalidPermissionId(1))
        );
        assert!(matches!(
            permissions.create_named_active_permission("invalidActive", 10, 100, &transfer_operations(), active_keys()),
            Err(PermissionError::InvalidThreshold(_))
        ));
        assert!(matches!(
            permissions.create_named_active_permission("invalidActive", 10, 2, b"invalidOptions", active_keys()),
            Err(PermissionError::InvalidOperations(_))
        ));
        assert!(matches!(
            permissions.create_named_active_permission("invalidActive", 10, 2, &[], active_keys()),
            Err(PermissionError::InvalidOperations(_))
        ));
        assert!(matches!(
            permissions.create_named_active_permission("invalidActive", 10, 1, &transfer_operations(), [("testInvalidAddress", 1)]),
            Err(PermissionError::InvalidAddress(_))
        ));
        assert!(matches!(
            permissions.create_active_permission(10, 1, &transfer_operations(), [("", 1)]),
            Err(PermissionError::InvalidSigners(_))
        ));
        assert!(matches!(
            permissions.create_active_permission(10, 1, &transfer_operations(), [(address(1), 0)]),
            Err(PermissionError::InvalidSigners(_))
        ));
        assert!(permissions.active_permissions().is_empty());
    }

    #[test]
    fn test_owner_threshold_scenario() {
        let permissions = account();
        assert!(permissions.create_owner_permission(1, [(address(1), 1)]).is_ok());
        assert!(matches!(
            permissions.create_owner_permission(2, [(address(1), 1)]),
            Err(PermissionError::InvalidThreshold(_))
        ));
        assert!(matches!(
            permissions.create_named_owner_permission(&"x".repeat(33), 1, [(address(1), 1)]),
            Err(PermissionError::InvalidName(_))
        ));
    }

    #[test]
    fn test_create_key() {
        let permissions = account();
        let key = permissions.create_key(&address(1), 3).unwrap();
        assert_eq!(key.base58_address(), address(1));
        assert_eq!(key.weight(), 3);

        let hex_address = crate::tron::utils::base58_to_hex(&address(1)).unwrap();
        assert_eq!(permissions.create_key(&hex_address, 3).unwrap(), key);

        match permissions.create_key("testInvalidAddress", 1) {
            Err(PermissionError::InvalidAddress(message)) => assert!(message.starts_with("Invalid key address")),
            other => panic!("expected InvalidAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_same_address_in_two_forms_is_a_duplicate_key() {
        let permissions = account();
        let base58 = address(1);
        let hex_address = crate::tron::utils::base58_to_hex(&base58).unwrap();
        let keys: BTreeMap<String, i64> = [(base58, 1), (hex_address, 1)].into_iter().collect();
        assert!(matches!(
            permissions.create_owner_permission(1, keys),
            Err(PermissionError::InvalidSigners(_))
        ));
    }

    #[test]
    fn test_from_account_and_update_request() {
        let owner_address = address(100);
        let account: Account = serde_json::from_value(serde_json::json!({
            "address": owner_address,
            "owner_permission": {
                "permission_name": "owner",
                "threshold": 1,
                "keys": [{"address": owner_address, "weight": 1}]
            },
            "active_permission": [{
                "type": "Active",
                "id": 2,
                "permission_name": "active",
                "threshold": 1,
                "operations": hex::encode(transfer_operations()),
                "keys": [{"address": owner_address, "weight": 1}]
            }]
        }))
        .unwrap();

        let mut permissions = AccountPermissions::from_account(&account).unwrap();
        assert_eq!(permissions.address(), owner_address);
        assert_eq!(permissions.owner_permission().unwrap().name(), "owner");
        assert!(permissions.witness_permission().is_none());
        assert_eq!(permissions.active_permission(2).unwrap().operations(), &transfer_operations()[..]);

        // Move the owner to a 2-of-3 multisig
        let owner = permissions.create_owner_permission(2, active_keys()).unwrap();
        permissions.set_owner_permission(owner).unwrap();

        let request = permissions.build_update_request(&TronConfig::mainnet(None)).unwrap();
        assert_eq!(request.owner_address, owner_address);
        assert_eq!(request.owner.threshold, 2);
        assert_eq!(request.owner.keys.len(), 3);
        assert!(request.witness.is_none());
        assert_eq!(request.actives.len(), 1);
        assert!(request.visible);

        let json = request.to_json().unwrap();
        assert_eq!(json["owner"]["type"], "Owner");
        assert_eq!(json["actives"][0]["type"], "Active");
        assert_eq!(json["actives"][0]["operations"], hex::encode(transfer_operations()));
        assert!(json.get("Permission_id").is_none());

        let hidden = permissions
            .build_update_request(&TronConfig { visible: false, permission_id: Some(2), ..TronConfig::default() })
            .unwrap();
        assert!(hidden.owner_address.starts_with("41"));
        assert!(hidden.owner.keys.iter().all(|k| k.address.starts_with("41")));
        assert_eq!(hidden.to_json().unwrap()["Permission_id"], 2);
    }

    fn permission_json(
        permission_type: &str,
        id: i32,
        threshold: i64,
        operations: bool,
    ) -> serde_json::Value {
        let mut json = serde_json::json!({
            "type": permission_type,
            "id": id,
            "permission_name": "chain",
            "threshold": threshold,
            "keys": [{"address": address(1), "weight": 1}]
        });
        if operations {
            json["operations"] = serde_json::Value::String(hex::encode(transfer_operations()));
        }
        json
    }

    fn load(owner: serde_json::Value, actives: Vec<serde_json::Value>) -> Result<AccountPermissions> {
        let account: Account = serde_json::from_value(serde_json::json!({
            "address": address(100),
            "owner_permission": owner,
            "active_permission": actives
        }))
        .unwrap();
        AccountPermissions::from_account(&account)
    }

    #[test]
    fn test_from_account_rejects_misplaced_permissions() {
        let owner = permission_json("Owner", 0, 1, false);
        let active = |id| permission_json("Active", id, 1, true);
        assert!(load(owner.clone(), vec![active(2), active(3)]).is_ok());

        // Active permission in the owner slot
        assert!(matches!(
            load(active(5), vec![active(2)]),
            Err(PermissionError::InvalidArgument(_))
        ));
        // Owner permission in the active list
        assert!(matches!(
            load(owner.clone(), vec![owner.clone(), active(2)]),
            Err(PermissionError::InvalidArgument(_))
        ));
        assert_eq!(
            load(owner.clone(), vec![active(2), active(2)]),
            Err(PermissionError::DuplicateId(2))
        );
        assert_eq!(
            load(owner.clone(), vec![permission_json("Active", 0, 1, true)]),
            Err(PermissionError::InvalidPermissionId(0))
        );
        assert!(matches!(
            load(owner.clone(), vec![permission_json("Active", 2, 1, false)]),
            Err(PermissionError::InvalidOperations(_))
        ));
        assert!(matches!(
            load(permission_json("Owner", 0, 9, false), vec![active(2)]),
            Err(PermissionError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_update_request_requires_owner_and_active() {
        let mut permissions = account();
        assert!(matches!(
            permissions.build_update_request(&TronConfig::default()),
            Err(PermissionError::InvalidArgument(_))
        ));

        let owner = permissions.create_owner_permission(1, [(address(100), 1)]).unwrap();
        permissions.set_owner_permission(owner).unwrap();
        assert!(matches!(
            permissions.build_update_request(&TronConfig::default()),
            Err(PermissionError::InvalidArgument(_))
        ));

        for id in 2..=10 {
            let active = permissions
                .create_active_permission(id, 1, &NONE_OPERATIONS, active_keys())
                .unwrap();
            permissions.add_active_permission(active).unwrap();
        }
        assert_eq!(
            permissions.build_update_request(&TronConfig::default()),
            Err(PermissionError::TooManyActivePermissions(9))
        );

        permissions.remove_active_permission(10).unwrap();
        assert!(permissions.build_update_request(&TronConfig::default()).is_ok());
    }

    mod proptest_account_permissions {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// A threshold above the total weight never builds
            #[test]
            fn threshold_above_total_weight_fails(
                weights in prop::collection::vec(1i64..100, 1..4),
                extra in 1i64..100,
            ) {
                let permissions = account();
                let total: i64 = weights.iter().sum();
                let keys: Vec<(String, i64)> = weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| (address(i as u8 + 1), *w))
                    .collect();

                let result = permissions.create_active_permission(2, total + extra, &NONE_OPERATIONS, keys.clone());
                prop_assert!(matches!(result, Err(PermissionError::InvalidThreshold(_))));
                prop_assert!(permissions.create_active_permission(2, total, &NONE_OPERATIONS, keys).is_ok());
            }

            /// Ids below 2 are refused, everything from 2 up is accepted
            #[test]
            fn active_id_floor(id in -1000i32..1000) {
                let permissions = account();
                let result = permissions.create_active_permission(id, 1, &NONE_OPERATIONS, [(address(1), 1)]);
                if id < 2 {
                    prop_assert_eq!(result, Err(PermissionError::InvalidPermissionId(id)));
                } else {
                    prop_assert!(result.is_ok());
                }
            }
        }
    }
}
