use std::collections::HashSet;

use crate::permission_error::{PermissionError, Result};
use super::operations::is_valid_operations;

/// Longest permission name the network accepts
pub const MAX_PERMISSION_NAME_LEN: usize = 32;

/// Lowest id an active permission may use; 0 and 1 belong to owner and witness
pub const MIN_ACTIVE_PERMISSION_ID: i32 = 2;

/// Validate a permission name (non-empty, at most 32 characters)
pub fn validate_permission_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > MAX_PERMISSION_NAME_LEN {
        return Err(PermissionError::InvalidName(format!(
            "Permission name cannot be empty or longer than {}: {:?}",
            MAX_PERMISSION_NAME_LEN, name
        )));
    }
    Ok(())
}

/// Validate signer keys against a threshold
///
/// Keys are given as `(address, weight)`; the address may be in any form as long as an
/// empty one is empty. The threshold must be reachable by the sum of all weights.
pub fn validate_keys_and_threshold<'a, I>(keys: I, threshold: i64) -> Result<()>
where
    I: IntoIterator<Item = (&'a [u8], i64)>,
{
    let mut seen = HashSet::new();
    let mut total_weight: i128 = 0;

    for (address, weight) in keys {
        if address.is_empty() {
            return Err(PermissionError::InvalidSigners(
                "Key address cannot be empty".to_string(),
            ));
        }
        if weight <= 0 {
            return Err(PermissionError::InvalidSigners(format!(
                "Key weight must be greater than 0, got {}",
                weight
            )));
        }
        if !seen.insert(address) {
            return Err(PermissionError::InvalidSigners(format!(
                "Duplicate key address: {}",
                hex::encode(address)
            )));
        }
        total_weight += i128::from(weight);
    }

    if seen.is_empty() {
        return Err(PermissionError::InvalidSigners("Keys cannot be empty".to_string()));
    }
    if threshold <= 0 {
        return Err(PermissionError::InvalidThreshold(format!(
            "Threshold must be greater than 0, got {}",
            threshold
        )));
    }
    if total_weight < i128::from(threshold) {
        return Err(PermissionError::InvalidThreshold(format!(
            "Sum of all key weights ({}) should be >= threshold ({})",
            total_weight, threshold
        )));
    }
    Ok(())
}

pub fn validate_active_permission_id(permission_id: i32) -> Result<()> {
    if permission_id < MIN_ACTIVE_PERMISSION_ID {
        return Err(PermissionError::InvalidPermissionId(permission_id));
    }
    Ok(())
}

pub fn validate_active_permission_operations(operations: &[u8]) -> Result<()> {
    if !is_valid_operations(operations) {
        return Err(PermissionError::InvalidOperations(format!(
            "Operations size must be 32, got {}",
            operations.len()
        )));
    }
    Ok(())
}
