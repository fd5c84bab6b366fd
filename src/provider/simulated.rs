use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::watch;

use super::{AccountSet, WalletProvider};
use crate::blockchain::{SimulatedChain, WillContract};
use crate::core::WillError;

/// Wallet over the development accounts of a [`SimulatedChain`].
pub struct SimulatedWallet {
    chain: Arc<SimulatedChain>,
    accounts: AccountSet,
}

impl SimulatedWallet {
    pub fn new(chain: Arc<SimulatedChain>, accounts: Vec<Address>) -> Self {
        Self { chain, accounts: AccountSet::new(accounts) }
    }

    pub fn chain(&self) -> &Arc<SimulatedChain> {
        &self.chain
    }

    pub fn all_accounts(&self) -> Vec<Address> {
        self.accounts.all()
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
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
        if address != self.chain.contract_address() {
            return Err(WillError::ConfigError(format!(
                "no contract deployed at {:?} on the simulated chain",
                address
            )));
        }
        Ok(match self.accounts.active() {
            Some(sender) => Arc::new(self.chain.connect(sender)),
            None => Arc::new(self.chain.read_only()),
        })
    }
}
