use async_trait::async_trait;
use ethers::{
    abi::Detokenize,
    contract::{ContractCall, ContractError},
    providers::{Http, Middleware, Provider},
    types::{Address, U256, U64},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use super::bindings::DecentralizedWillContract;
use super::traits::{TxOutcome, WillContract};
use crate::core::{Will, WillError};

/// Human-readable name for a chain id.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "ethereum".to_string(),
        11155111 => "sepolia".to_string(),
        31337 => "hardhat".to_string(),
        137 => "polygon".to_string(),
        _ => format!("ethereum-{}", chain_id),
    }
}

/// Builds an HTTP provider and returns it with the chain id the node reports.
pub async fn connect_http(
    rpc_url: &str,
    timeout_seconds: u64,
) -> Result<(Provider<Http>, u64), WillError> {
    // Clean RPC URL
    let rpc_url_clean = rpc_url.trim();
    let parsed_url = reqwest::Url::parse(rpc_url_clean).map_err(|e| {
        WillError::ConfigError(format!(
            "Invalid RPC URL '{}': {}. Please check config.toml or WILL_RPC_URL.",
            rpc_url_clean, e
        ))
    })?;

    info!("Connecting to RPC endpoint: {}", parsed_url);
    // Short request timeout; honour proxy environment vars.
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_seconds));
    if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
        match reqwest::Proxy::all(&proxy) {
            Ok(p) => builder = builder.proxy(p),
            Err(e) => warn!(error = %e, "Ignoring invalid proxy setting"),
        }
    }
    let client = builder
        .build()
        .map_err(|e| WillError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

    let provider = Provider::new(Http::new_with_client(parsed_url.clone(), client));

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| {
            WillError::NetworkError(format!(
                "Failed to get chain ID from {}: {}. Is the node running?",
                parsed_url, e
            ))
        })?
        .as_u64();

    info!("Connected to {} (Chain ID: {})", network_name(chain_id), chain_id);
    Ok((provider, chain_id))
}

fn map_contract_error<M: Middleware>(err: ContractError<M>) -> WillError {
    if let Some(reason) = err.decode_revert::<String>() {
        return WillError::Reverted(reason);
    }
    if err.is_revert() {
        return WillError::Reverted("without reason".to_string());
    }
    WillError::ContractError(err.to_string())
}

async fn send_and_confirm<M, D>(call: ContractCall<M, D>) -> Result<TxOutcome, WillError>
where
    M: Middleware + 'static,
    D: Detokenize,
{
    let pending = call.send().await.map_err(map_contract_error::<M>)?;
    let tx_hash = pending.tx_hash();
    debug!(tx_hash = ?tx_hash, "Transaction submitted, waiting for receipt");

    let receipt = pending.await.map_err(|e| {
        WillError::NetworkError(format!("Failed to fetch receipt for {:?}: {}", tx_hash, e))
    })?;

    match receipt {
        Some(r) if r.status == Some(U64::from(1)) => {
            let block_number = r.block_number.map(|b| b.as_u64());
            info!(tx_hash = ?tx_hash, block = ?block_number, "Transaction confirmed");
            Ok(TxOutcome { tx_hash, block_number })
        }
        Some(_) => Err(WillError::TransactionFailed(format!("{:?} reverted on-chain", tx_hash))),
        None => Err(WillError::TransactionFailed(format!(
            "{:?} was dropped before being mined",
            tx_hash
        ))),
    }
}

/// RPC-backed contract handle. `M` is a `SignerMiddleware` for signed
/// handles or a bare `Provider` for read-only ones.
pub struct EthereumWillContract<M> {
    contract: DecentralizedWillContract<M>,
    sender: Option<Address>,
}

impl<M: Middleware + 'static> EthereumWillContract<M> {
    pub fn new(address: Address, client: Arc<M>, sender: Option<Address>) -> Self {
        Self { contract: DecentralizedWillContract::new(address, client), sender }
    }

    fn require_sender(&self) -> Result<Address, WillError> {
        self.sender.ok_or(WillError::NoSigner)
    }
}

#[async_trait]
impl<M> WillContract for EthereumWillContract<M>
where
    M: Middleware + 'static,
{
    fn address(&self) -> Address {
        self.contract.address()
    }

    fn sender(&self) -> Option<Address> {
        self.sender
    }

    async fn set_will(
        &self,
        beneficiary: Address,
        inactivity_period: U256,
        value: U256,
    ) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        info!(from = ?sender, beneficiary = ?beneficiary, %inactivity_period, %value, "setWill");
        let call = self.contract.set_will(beneficiary, inactivity_period).value(value);
        send_and_confirm(call).await
    }

    async fn add_to_will(&self, will_id: U256, value: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        info!(from = ?sender, %will_id, %value, "addToWill");
        let call = self.contract.add_to_will(will_id).value(value);
        send_and_confirm(call).await
    }

    async fn get_all_wills(&self, owner: Address) -> Result<Vec<Will>, WillError> {
        debug!(owner = ?owner, "getAllWills");
        let raw = self.contract.get_all_wills(owner).call().await.map_err(map_contract_error::<M>)?;
        Ok(raw.into_iter().map(Will::from).collect())
    }

    async fn is_claimable(&self, owner: Address, will_id: U256) -> Result<bool, WillError> {
        debug!(owner = ?owner, %will_id, "isClaimable");
        self.contract
            .is_claimable(owner, will_id)
            .call()
            .await
            .map_err(map_contract_error::<M>)
    }

    async fn claim(&self, owner: Address, will_id: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        info!(from = ?sender, owner = ?owner, %will_id, "claim");
        send_and_confirm(self.contract.claim(owner, will_id)).await
    }

    async fn heartbeat(&self, will_id: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        info!(from = ?sender, %will_id, "heartbeat");
        send_and_confirm(self.contract.heartbeat(will_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use std::str::FromStr;

    // read-only handle against an address nobody listens on
    fn make_read_only() -> EthereumWillContract<Provider<Http>> {
        let provider = Provider::<Http>::try_from("http://127.0.0.1:9").expect("provider url ok");
        let address = Address::from_str("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        EthereumWillContract::new(address, Arc::new(provider), None)
    }

    #[test]
    fn test_network_name() {
        assert_eq!(network_name(1), "ethereum");
        assert_eq!(network_name(31337), "hardhat");
        assert_eq!(network_name(5), "ethereum-5");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_writes_without_sender_fail_fast() {
        let contract = make_read_only();
        assert_eq!(contract.sender(), None);
        let err = contract.heartbeat(U256::one()).await.unwrap_err();
        assert!(matches!(err, WillError::NoSigner));
        let err = contract
            .set_will(Address::repeat_byte(0x11), U256::from(60u64), U256::exp10(18))
            .await
            .unwrap_err();
        assert!(matches!(err, WillError::NoSigner));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_connect_http_rejects_bad_url() {
        let err = connect_http("not a url", 1).await.unwrap_err();
        assert!(matches!(err, WillError::ConfigError(_)));
    }
}
