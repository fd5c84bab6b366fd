use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
    types::Address,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{AccountSet, WalletProvider};
use crate::blockchain::ethereum::{connect_http, EthereumWillContract};
use crate::blockchain::WillContract;
use crate::core::config::NetworkConfig;
use crate::core::WillError;

fn parse_key(hex_key: &str, chain_id: u64) -> Result<LocalWallet, String> {
    let bytes = hex::decode(hex_key.trim().trim_start_matches("0x")).map_err(|e| e.to_string())?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    LocalWallet::from_bytes(&bytes)
        .map(|w| w.with_chain_id(chain_id))
        .map_err(|e| e.to_string())
}

/// Keyring of local private keys signing over JSON-RPC.
pub struct LocalKeyWallet {
    provider: Provider<Http>,
    chain_id: u64,
    keys: Vec<LocalWallet>,
    accounts: AccountSet,
}

impl LocalKeyWallet {
    /// Builds a keyring from hex private keys (with or without `0x`).
    /// An empty key list is allowed and yields a read-only wallet.
    pub fn new(
        provider: Provider<Http>,
        chain_id: u64,
        keys: &[String],
    ) -> Result<Self, WillError> {
        let keys = keys
            .iter()
            .enumerate()
            .map(|(i, hex_key)| {
                // Do NOT log key material.
                parse_key(hex_key, chain_id).map_err(|e| {
                    WillError::InvalidInput(format!("private key #{} is invalid: {}", i, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let addresses = keys.iter().map(|w| w.address()).collect::<Vec<_>>();
        debug!(count = addresses.len(), chain_id, "Keyring loaded");
        Ok(Self { provider, chain_id, keys, accounts: AccountSet::new(addresses) })
    }

    /// Connects to the configured node, checking the chain id when one is expected.
    pub async fn connect(network: &NetworkConfig, keys: &[String]) -> Result<Self, WillError> {
        let (provider, chain_id) = connect_http(&network.rpc_url, network.timeout_seconds).await?;
        if let Some(expected) = network.chain_id {
            if expected != chain_id {
                return Err(WillError::ConfigError(format!(
                    "node at {} reports chain {} but {} is configured",
                    network.rpc_url, chain_id, expected
                )));
            }
        }
        info!(network = %network.name, chain_id, "Wallet provider ready");
        Self::new(provider, chain_id, keys)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    /// Signing middleware for the active account.
    pub fn signer_middleware(
        &self,
    ) -> Result<Arc<SignerMiddleware<Provider<Http>, LocalWallet>>, WillError> {
        let active = self.accounts.active().ok_or(WillError::NoSigner)?;
        let wallet = self
            .keys
            .iter()
            .find(|w| w.address() == active)
            .cloned()
            .ok_or(WillError::NoSigner)?;
        Ok(Arc::new(SignerMiddleware::new(self.provider.clone(), wallet)))
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WillError> {
        self.accounts.request()
    }

    async fn accounts(&self) -> Result<Vec<Address>, WillError> {
        Ok(self.accounts.exposed_accounts())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Address>> {
        self.accounts.subscribe()
    }

    fn switch_account(&self, index: usize) -> Result<Address, WillError> {
        self.accounts.switch(index)
    }

    fn disconnect(&self) {
        self.accounts.disconnect()
    }

    async fn contract(&self, address: Address) -> Result<Arc<dyn WillContract>, WillError> {
        match self.signer_middleware() {
            Ok(client) => {
                let sender = client.address();
                Ok(Arc::new(EthereumWillContract::new(address, client, Some(sender))))
            }
            Err(WillError::NoSigner) => {
                debug!("No authorized account, using read-only provider");
                let client = Arc::new(self.provider.clone());
                Ok(Arc::new(EthereumWillContract::new(address, client, None)))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    // first Hardhat development key
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn provider() -> Provider<Http> {
        Provider::<Http>::try_from("http://127.0.0.1:8545").expect("provider url ok")
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_keyring_addresses() {
        let wallet = LocalKeyWallet::new(provider(), 31337, &[DEV_KEY.to_string()]).unwrap();
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(
            format!("{:?}", accounts[0]),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.signer_middleware().unwrap().signer().chain_id(), 31337);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let err = LocalKeyWallet::new(provider(), 1, &["zz".to_string()]).err().unwrap();
        assert!(err.to_string().contains("private key #0"));

        let err = LocalKeyWallet::new(provider(), 1, &[DEV_KEY.to_string(), "0xabcd".to_string()])
            .err()
            .unwrap();
        assert!(err.to_string().contains("private key #1 is invalid: expected 32 bytes, got 2"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_no_keys_gives_read_only_contract() {
        let wallet = LocalKeyWallet::new(provider(), 1, &[]).unwrap();
        assert!(matches!(wallet.request_accounts().await, Err(WillError::WalletUnavailable)));
        let contract = wallet.contract(Address::repeat_byte(9)).await.unwrap();
        assert_eq!(contract.sender(), None);
    }
}
