use candid::CandidType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the permission model can surface to a caller
#[derive(Error, Debug, Clone, CandidType, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid permission name: {0}")]
    InvalidName(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid signers: {0}")]
    InvalidSigners(String),

    #[error("Invalid active permission id {0}: must be greater than or equal to 2")]
    InvalidPermissionId(i32),

    #[error("Invalid operations: {0}")]
    InvalidOperations(String),

    #[error("Invalid operations wire format: expected 32 bytes, got {0}")]
    InvalidWireFormat(usize),

    #[error("Invalid contract type id: {0}")]
    InvalidCategory(i32),

    #[error("Unknown contract type name: {0}")]
    UnknownCategory(String),

    #[error("No contract type registered for id {0}")]
    UnknownCategoryId(i32),

    #[error("Active permission {0} not found")]
    NotFound(i32),

    #[error("Active permission id {0} already exists")]
    DuplicateId(i32),

    #[error("Too many active permissions: {0} (at most 8)")]
    TooManyActivePermissions(usize),

    // Address and signing errors
    #[error("Invalid Tron address: {0}")]
    InvalidAddress(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, PermissionError>;
