//! Account permissions and multi-signature authorization for Tron accounts.
//!
//! Load an account's permissions with [`AccountPermissions::from_account`], change them
//! locally, and produce the body of an `AccountPermissionUpdateContract` request with
//! [`AccountPermissions::build_update_request`]. Active permissions are scoped to
//! contract types through a 32-byte operations mask, see [`tron::operations`].

pub mod permission_error;
pub mod tron;
pub mod types;

pub use permission_error::{PermissionError, Result};
pub use tron::{ContractType, Key, KeyPair, Permission, PermissionType, TronConfig};
pub use types::account_permissions::AccountPermissions;
