/// Tron account permission model
///
/// This module provides:
/// - The contract type registry and the 32-byte operations mask codec
/// - Permission values and their validation rules
/// - Address codec and secp256k1 key pairs
/// - Permission-update request payloads and multi-signature transaction signing

pub mod config;
pub mod contract_type;
pub mod key_pair;
pub mod operations;
pub mod permission;
pub mod permission_update;
pub mod transaction;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items
pub use config::{TronConfig, TronNetwork};
pub use contract_type::ContractType;
pub use key_pair::KeyPair;
pub use operations::*;
pub use permission::{Key, Permission};
pub use permission_update::AccountPermissionUpdateRequest;
pub use transaction::TronTransaction;
pub use types::*;
pub use utils::{parse_address, validate_tron_address};
