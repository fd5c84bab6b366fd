// tests/util.rs
// Shared helpers for the integration suites

#![allow(dead_code)]

use decentralized_will::app::Dashboard;
use decentralized_will::blockchain::simulated::ether;
use decentralized_will::blockchain::{SimulatedChain, SimulatedWillContract};
use decentralized_will::i18n::Messages;
use decentralized_will::provider::SimulatedWallet;
use ethers::types::Address;
use std::sync::Arc;

pub const GENESIS: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;

/// Simulated chain with three funded accounts: owner, beneficiary, stranger.
pub struct Fixture {
    pub chain: Arc<SimulatedChain>,
    pub accounts: Vec<Address>,
}

impl Fixture {
    pub fn new() -> Self {
        let chain = SimulatedChain::new(GENESIS);
        let accounts = chain.dev_accounts(3, ether(100));
        Self { chain, accounts }
    }

    pub fn owner(&self) -> Address {
        self.accounts[0]
    }

    pub fn beneficiary(&self) -> Address {
        self.accounts[1]
    }

    pub fn stranger(&self) -> Address {
        self.accounts[2]
    }

    pub fn as_owner(&self) -> SimulatedWillContract {
        self.chain.connect(self.owner())
    }

    pub fn as_beneficiary(&self) -> SimulatedWillContract {
        self.chain.connect(self.beneficiary())
    }

    pub fn as_stranger(&self) -> SimulatedWillContract {
        self.chain.connect(self.stranger())
    }

    pub fn wallet(&self) -> Arc<SimulatedWallet> {
        Arc::new(SimulatedWallet::new(Arc::clone(&self.chain), self.accounts.clone()))
    }

    pub fn dashboard(&self) -> (Dashboard, Arc<SimulatedWallet>) {
        let wallet = self.wallet();
        let dashboard = Dashboard::new(wallet.clone(), self.chain.contract_address(), english());
        (dashboard, wallet)
    }
}

pub fn english() -> Messages {
    Messages::bundled("en").expect("bundled catalogs load")
}
