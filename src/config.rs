use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    addresses::{FANTOM_CHAIN_ID, FANTOM_RPC_URL, PortalAddresses, RARITY_SUBGRAPH_URL},
    clients::names::PollSettings,
    connection::ConnectorSettings,
};

pub const PRIVATE_KEY_ENV: &str = "RARITY_PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "RARITY_RPC_URL";

/// Portal settings. Every field has a Fantom default, so a config file only
/// needs the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub subgraph_url: String,
    pub addresses: PortalAddresses,
    /// Where the remembered connector is stored; in memory when unset.
    pub storage_path: Option<PathBuf>,
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub verify_chain: bool,
    /// Pause after a wallet login before the account is reported.
    pub settle_interval_ms: u64,
    pub name_poll_interval_ms: u64,
    pub name_poll_attempts: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        let poll = PollSettings::default();
        Self {
            rpc_url: FANTOM_RPC_URL.to_string(),
            chain_id: FANTOM_CHAIN_ID,
            subgraph_url: RARITY_SUBGRAPH_URL.to_string(),
            addresses: PortalAddresses::default(),
            storage_path: None,
            private_key: None,
            verify_chain: true,
            settle_interval_ms: 1000,
            name_poll_interval_ms: poll.interval.as_millis() as u64,
            name_poll_attempts: poll.max_attempts,
        }
    }
}

impl PortalConfig {
    /// Reads `path` when given (defaults otherwise), then applies the
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                serde_json::from_str(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var(PRIVATE_KEY_ENV) {
            if !key.trim().is_empty() {
                self.private_key = Some(key);
            }
        }
        if let Ok(url) = env::var(RPC_URL_ENV) {
            if !url.trim().is_empty() {
                self.rpc_url = url;
            }
        }
    }

    pub fn connector_settings(&self) -> ConnectorSettings {
        ConnectorSettings {
            rpc_url: self.rpc_url.clone(),
            chain_id: self.chain_id,
            private_key: self.private_key.clone(),
            verify_chain: self.verify_chain,
        }
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    pub fn name_poll(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.name_poll_interval_ms),
            max_attempts: self.name_poll_attempts,
        }
    }
}
