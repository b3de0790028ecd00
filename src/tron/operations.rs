//! Encoding of an active permission's `operations` field.
//!
//! Each bit of the 32-byte mask stands for one [`ContractType`]: byte `id / 8`, bit
//! `id % 8` counted from the least significant bit. That covers ids 0 through 255.

use hex;

use crate::permission_error::{PermissionError, Result};
use super::contract_type::ContractType;

/// Length of an operations mask in bytes
pub const OPERATIONS_LEN: usize = 32;

/// Highest contract type id a mask can hold, plus one
const MAX_CONTRACT_ID: i32 = (OPERATIONS_LEN * 8) as i32;

/// Mask with no operation enabled
pub const NONE_OPERATIONS: [u8; OPERATIONS_LEN] = [0u8; OPERATIONS_LEN];

/// Hex form of [`NONE_OPERATIONS`]
pub const NONE_OPERATIONS_HEX: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

fn check_contract_id(contract_id: i32) -> Result<usize> {
    if !(0..MAX_CONTRACT_ID).contains(&contract_id) {
        return Err(PermissionError::InvalidCategory(contract_id));
    }
    Ok(contract_id as usize)
}

/// Encode contract ids into an operations mask
///
/// An empty slice yields [`NONE_OPERATIONS`].
pub fn encode_operations(contract_ids: &[i32]) -> Result<[u8; OPERATIONS_LEN]> {
    let mut operations = NONE_OPERATIONS;
    for &contract_id in contract_ids {
        let id = check_contract_id(contract_id)?;
        operations[id / 8] |= 1 << (id % 8);
    }
    Ok(operations)
}

/// Encode typed contract types into an operations mask
pub fn encode_contract_types(contract_types: &[ContractType]) -> [u8; OPERATIONS_LEN] {
    let mut operations = NONE_OPERATIONS;
    for contract_type in contract_types {
        let id = contract_type.id() as usize;
        operations[id / 8] |= 1 << (id % 8);
    }
    operations
}

/// Encode contract type names (e.g. `"TransferContract"`) into an operations mask
pub fn encode_operations_by_name<S: AsRef<str>>(
    contract_names: &[S],
) -> Result<[u8; OPERATIONS_LEN]> {
    let contract_types = contract_names
        .iter()
        .map(|name| {
            ContractType::from_name(name.as_ref())
                .ok_or_else(|| PermissionError::UnknownCategory(name.as_ref().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(encode_contract_types(&contract_types))
}

/// Encode contract ids straight to the 64-char hex form used by the HTTP API
pub fn encode_operations_hex(contract_ids: &[i32]) -> Result<String> {
    Ok(hex::encode(encode_operations(contract_ids)?))
}

/// Decode an operations mask into the contract types it enables, in id order
///
/// Every set bit must map to a registered contract type. A mask that mentions an
/// unregistered id is rejected rather than silently narrowed.
pub fn decode_operations(operations: &[u8]) -> Result<Vec<ContractType>> {
    if !is_valid_operations(operations) {
        return Err(PermissionError::InvalidWireFormat(operations.len()));
    }

    let mut contract_types = Vec::new();
    for (i, byte) in operations.iter().enumerate() {
        for j in 0..8 {
            if (byte >> j) & 0x1 == 1 {
                let contract_id = (i * 8 + j) as i32;
                let contract_type = ContractType::from_id(contract_id)
                    .ok_or(PermissionError::UnknownCategoryId(contract_id))?;
                contract_types.push(contract_type);
            }
        }
    }
    Ok(contract_types)
}

/// Decode the 64-char hex form of an operations mask
pub fn decode_operations_hex(hex_operations: &str) -> Result<Vec<ContractType>> {
    if hex_operations.len() != OPERATIONS_LEN * 2 {
        return Err(PermissionError::InvalidWireFormat(hex_operations.len() / 2));
    }
    let operations = hex::decode(hex_operations).map_err(|e| {
        PermissionError::SerializationError(format!("Invalid operations hex: {}", e))
    })?;
    decode_operations(&operations)
}

/// Shape check only: true iff the mask is exactly 32 bytes
pub fn is_valid_operations(operations: &[u8]) -> bool {
    !operations.is_empty() && operations.len() == OPERATIONS_LEN
}

/// Build a new mask by enabling or disabling contract ids on top of `current`
///
/// An empty `current` starts from [`NONE_OPERATIONS`]. The input is never modified; an
/// empty `contract_ids` returns a copy of the starting mask.
pub fn build_operations(
    current: &[u8],
    enable: bool,
    contract_ids: &[i32],
) -> Result<[u8; OPERATIONS_LEN]> {
    let mut operations = NONE_OPERATIONS;
    if !current.is_empty() {
        if !is_valid_operations(current) {
            return Err(PermissionError::InvalidWireFormat(current.len()));
        }
        operations.copy_from_slice(current);
    }

    // Validate everything first so a bad id leaves no partial result behind
    let ids = contract_ids
        .iter()
        .map(|&contract_id| check_contract_id(contract_id))
        .collect::<Result<Vec<_>>>()?;

    for id in ids {
        if enable {
            operations[id / 8] |= 1 << (id % 8);
        } else {
            operations[id / 8] &= !(1 << (id % 8));
        }
    }
    Ok(operations)
}

/// [`build_operations`] over typed contract types
pub fn build_operations_for(
    current: &[u8],
    enable: bool,
    contract_types: &[ContractType],
) -> Result<[u8; OPERATIONS_LEN]> {
    let ids: Vec<i32> = contract_types.iter().map(|c| c.id()).collect();
    build_operations(current, enable, &ids)
}
