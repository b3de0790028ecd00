use serde::{Deserialize, Serialize};

use crate::permission_error::{PermissionError, Result};

/// Tron network a request is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TronNetwork {
    #[default]
    Mainnet,
    Shasta,
    Nile,
}

impl TronNetwork {
    /// TronGrid base URL of the network
    pub fn api_url(self) -> &'static str {
        match self {
            TronNetwork::Mainnet => "https://api.trongrid.io",
            TronNetwork::Shasta => "https://api.shasta.trongrid.io",
            TronNetwork::Nile => "https://nile.trongrid.io",
        }
    }
}

impl std::str::FromStr for TronNetwork {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(TronNetwork::Mainnet),
            "shasta" | "testnet" => Ok(TronNetwork::Shasta),
            "nile" => Ok(TronNetwork::Nile),
            other => Err(PermissionError::InvalidArgument(format!(
                "Unknown Tron network: {}",
                other
            ))),
        }
    }
}

/// Settings for building permission-update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TronConfig {
    pub network: TronNetwork,
    /// Overrides the network's TronGrid URL (private nodes, proxies)
    pub api_url: Option<String>,
    /// Optional TronGrid API key for higher rate limits
    pub api_key: Option<String>,
    /// Render addresses as Base58 (true) or hex (false) in request bodies
    pub visible: bool,
    /// Permission that will sign the update transaction; `None` means owner
    pub permission_id: Option<i32>,
}

impl Default for TronConfig {
    fn default() -> Self {
        Self {
            network: TronNetwork::Mainnet,
            api_url: None,
            api_key: None,
            visible: true,
            permission_id: None,
        }
    }
}

impl TronConfig {
    /// Mainnet settings
    pub fn mainnet(api_key: Option<String>) -> Self {
        Self { api_key, ..Self::default() }
    }

    /// Testnet (Shasta) settings
    pub fn testnet(api_key: Option<String>) -> Self {
        Self { network: TronNetwork::Shasta, api_key, ..Self::default() }
    }

    /// Settings from `TRON_NETWORK`, `TRON_API_URL` and `TRON_PRO_API_KEY`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(network) = std::env::var("TRON_NETWORK") {
            config.network = network.parse()?;
        }
        config.api_url = std::env::var("TRON_API_URL").ok().filter(|v| !v.is_empty());
        config.api_key = std::env::var("TRON_PRO_API_KEY").ok().filter(|v| !v.is_empty());
        Ok(config)
    }

    /// Base URL requests go to
    pub fn base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.network.api_url())
            .trim_end_matches('/')
    }
}
