use thiserror::Error;

/// Error type shared by the contract bindings, the wallet adapter and the dashboard.
#[derive(Debug, Error)]
pub enum WillError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No wallet detected")]
    WalletUnavailable,

    #[error("No signer available (wallet not connected or no account unlocked)")]
    NoSigner,

    #[error("Network error: {0}")]
    NetworkError(String),

    /// The contract rejected the call; carries the revert reason.
    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Deployment error: {0}")]
    DeploymentError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WillError {
    /// Revert reason if the contract rejected the call.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            WillError::Reverted(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WillError {
    fn from(err: std::io::Error) -> Self {
        WillError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for WillError {
    fn from(err: serde_json::Error) -> Self {
        WillError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for WillError {
    fn from(err: toml::de::Error) -> Self {
        WillError::ConfigError(err.to_string())
    }
}
