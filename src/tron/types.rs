use candid::{CandidType, Deserialize};
use serde::Serialize;

/// Tron address (Base58Check encoded, starts with 'T')
pub type TronAddress = String;

/// Transaction hash on Tron blockchain
pub type TxHash = String;

/// Layer a permission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, CandidType, Serialize, Deserialize)]
pub enum PermissionType {
    /// Controls the account itself, id 0
    #[default]
    Owner,
    /// Block production, id 1
    Witness,
    /// Operation-scoped permissions, id >= 2
    Active,
}

/// Signer entry as TronGrid renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyJson {
    /// Base58 when the request is `visible`, hex otherwise
    pub address: String,
    pub weight: i64,
}

/// Permission as TronGrid renders it
///
/// The owner permission usually comes back without `type` and `id` because both hold
/// their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionJson {
    #[serde(rename = "type", default)]
    pub permission_type: PermissionType,
    #[serde(default)]
    pub id: i32,
    pub permission_name: String,
    pub threshold: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub parent_id: i32,
    /// Hex-encoded 32-byte mask, active permissions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<String>,
    pub keys: Vec<KeyJson>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// On-chain account state, as returned by `/wallet/getaccount`
///
/// Only the fields the permission model needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub owner_permission: Option<PermissionJson>,
    #[serde(default)]
    pub witness_permission: Option<PermissionJson>,
    #[serde(default)]
    pub active_permission: Vec<PermissionJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TronGridRawData {
    pub contract: Vec<TronGridContract>,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TronGridContract {
    pub parameter: TronGridParameter,
    #[serde(rename = "type")]
    pub contract_type: String,
    /// Permission that must authorize this contract; absent means owner (0)
    #[serde(rename = "Permission_id", default, skip_serializing_if = "Option::is_none")]
    pub permission_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TronGridParameter {
    pub value: serde_json::Value,
}

/// Transaction to be signed and broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: TronGridRawData,
    pub raw_data_hex: String,
}

/// Signed transaction ready for broadcast
///
/// Multi-signed transactions carry one signature per signer, in signing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: TronGridRawData,
    pub raw_data_hex: String,
    pub signature: Vec<String>,
}
