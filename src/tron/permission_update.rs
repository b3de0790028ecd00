use serde::{Deserialize, Serialize};

use crate::permission_error::{PermissionError, Result};
use super::config::TronConfig;
use super::types::PermissionJson;

/// Most active permissions an account may hold
pub const MAX_ACTIVE_PERMISSIONS: usize = 8;

/// TronGrid path that turns this request into an unsigned transaction
pub const ACCOUNT_PERMISSION_UPDATE_PATH: &str = "/wallet/accountpermissionupdate";

/// Body of `/wallet/accountpermissionupdate`
///
/// Built by [`crate::AccountPermissions::build_update_request`]. The node answers with an
/// unsigned `AccountPermissionUpdateContract` transaction that must then be signed by
/// keys meeting the current owner threshold (or `Permission_id`'s threshold).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPermissionUpdateRequest {
    pub owner_address: String,
    pub owner: PermissionJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness: Option<PermissionJson>,
    pub actives: Vec<PermissionJson>,
    pub visible: bool,
    #[serde(rename = "Permission_id", default, skip_serializing_if = "Option::is_none")]
    pub permission_id: Option<i32>,
}

impl AccountPermissionUpdateRequest {
    /// Full URL the request should be posted to
    pub fn endpoint(config: &TronConfig) -> String {
        format!("{}{}", config.base_url(), ACCOUNT_PERMISSION_UPDATE_PATH)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            PermissionError::SerializationError(format!("Failed to serialize request: {}", e))
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            PermissionError::SerializationError(format!("Failed to serialize request: {}", e))
        })
    }
}
