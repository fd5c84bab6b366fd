use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::errors::WillError;
use crate::core::validation::parse_address;
use crate::deploy::{read_deployment, DEPLOYMENT_KEY};

/// RPC network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "NetworkConfig::default_name")]
    pub name: String,

    #[serde(default = "NetworkConfig::default_rpc_url")]
    pub rpc_url: String,

    /// Expected chain id; the connected node must report the same one.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// HTTP request timeout (seconds)
    #[serde(default = "NetworkConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl NetworkConfig {
    fn default_name() -> String { "localhost".to_string() }
    fn default_rpc_url() -> String { "http://127.0.0.1:8545".to_string() }
    fn default_timeout() -> u64 { 10 }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            rpc_url: Self::default_rpc_url(),
            chain_id: None,
            timeout_seconds: Self::default_timeout(),
        }
    }
}

/// Contract location and build artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Deployed address; falls back to the deployment record when unset.
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default = "ContractConfig::default_deployments_dir")]
    pub deployments_dir: PathBuf,

    #[serde(default = "ContractConfig::default_artifact_path")]
    pub artifact_path: PathBuf,
}

impl ContractConfig {
    fn default_deployments_dir() -> PathBuf { PathBuf::from("deployments") }
    fn default_artifact_path() -> PathBuf {
        PathBuf::from("artifacts/contracts/DecentralizedWill.sol/DecentralizedWill.json")
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: None,
            deployments_dir: Self::default_deployments_dir(),
            artifact_path: Self::default_artifact_path(),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "UiConfig::default_language")]
    pub language: String,
}

impl UiConfig {
    fn default_language() -> String { "en".to_string() }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { language: Self::default_language() }
    }
}

/// Top-level client configuration (`config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, WillError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the config file (explicit path, `CONFIG_PATH`, or `config.toml`),
    /// then applies environment overrides. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, WillError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("CONFIG_PATH").ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    WillError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
                })?;
                info!(path = %path.display(), "Loaded configuration");
                Self::from_toml_str(&content)?
            }
            None => match std::fs::read_to_string("config.toml") {
                Ok(content) => {
                    info!("Loaded configuration from config.toml");
                    Self::from_toml_str(&content)?
                }
                Err(_) => {
                    debug!("config.toml not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WILL_RPC_URL") {
            self.network.rpc_url = url;
        } else if let Ok(url) = std::env::var("INFURA_URL") {
            if !url.trim().is_empty() {
                self.network.rpc_url = url;
            }
        }

        if let Ok(raw) = std::env::var("WILL_CHAIN_ID") {
            match raw.trim().parse::<u64>() {
                Ok(id) => self.network.chain_id = Some(id),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid WILL_CHAIN_ID"),
            }
        }

        if let Ok(addr) = std::env::var("WILL_CONTRACT_ADDRESS") {
            if !addr.trim().is_empty() {
                self.contract.address = Some(addr.trim().to_string());
            }
        }

        if let Ok(lang) = std::env::var("WILL_LANGUAGE") {
            self.ui.language = lang;
        }
    }

    /// Configured contract address, else the recorded deployment for `chain_id`.
    pub fn contract_address(&self, chain_id: u64) -> Result<Address, WillError> {
        if let Some(addr) = &self.contract.address {
            return parse_address(addr);
        }
        match read_deployment(&self.contract.deployments_dir, chain_id, DEPLOYMENT_KEY)? {
            Some(addr) => {
                info!(address = ?addr, chain_id, "Using recorded deployment");
                Ok(addr)
            }
            None => Err(WillError::ConfigError(format!(
                "No contract address configured and no deployment recorded for chain {}. \
                 Set WILL_CONTRACT_ADDRESS or run the deploy binary.",
                chain_id
            ))),
        }
    }
}

/// Signing keys from `WILL_PRIVATE_KEYS` (comma separated hex). Kept out of
/// `AppConfig` so they never end up in a serialized config.
pub fn private_keys_from_env() -> Vec<String> {
    std::env::var("WILL_PRIVATE_KEYS")
        .map(|raw| {
            raw.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.network.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(cfg.network.timeout_seconds, 10);
        assert_eq!(cfg.ui.language, "en");
        assert!(cfg.contract.address.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[network]
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111
"#,
        )
        .unwrap();
        assert_eq!(cfg.network.rpc_url, "https://rpc.sepolia.org");
        assert_eq!(cfg.network.chain_id, Some(11155111));
        assert_eq!(cfg.network.name, "localhost");
        assert_eq!(cfg.contract.deployments_dir, PathBuf::from("deployments"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("[network\nrpc_url = 1").unwrap_err();
        assert!(matches!(err, WillError::ConfigError(_)));
    }
}
