//! In-process stand-in for a node running the DecentralizedWill contract.
//!
//! Behaves like the deployed contract as far as the client can observe:
//! same call surface, same revert reasons, native balances move with every
//! payable call and every claim. Time only moves through
//! [`SimulatedChain::increase_time`].

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::{TxOutcome, WillContract};
use crate::core::{Will, WillError};

/// One ether in wei.
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::exp10(18)
}

#[derive(Debug)]
struct ChainState {
    timestamp: u64,
    block_number: u64,
    tx_count: u64,
    balances: HashMap<Address, U256>,
    contract_balance: U256,
    wills: HashMap<Address, Vec<Will>>,
}

impl ChainState {
    fn mine(&mut self, sender: Address) -> TxOutcome {
        self.block_number += 1;
        self.tx_count += 1;
        let mut preimage = Vec::with_capacity(28);
        preimage.extend_from_slice(sender.as_bytes());
        preimage.extend_from_slice(&self.tx_count.to_be_bytes());
        TxOutcome {
            tx_hash: H256::from(keccak256(preimage)),
            block_number: Some(self.block_number),
        }
    }

    fn debit(&mut self, account: Address, value: U256) -> Result<(), WillError> {
        let balance = self.balances.entry(account).or_default();
        if *balance < value {
            return Err(WillError::Reverted(format!(
                "insufficient funds for value: have {} want {}",
                balance, value
            )));
        }
        *balance -= value;
        self.contract_balance += value;
        Ok(())
    }

    fn will_mut(&mut self, owner: Address, will_id: U256) -> Result<&mut Will, WillError> {
        let index = will_index(will_id)?;
        self.wills
            .get_mut(&owner)
            .and_then(|list| list.get_mut(index))
            .ok_or_else(|| revert("Will does not exist"))
    }

    fn will(&self, owner: Address, will_id: U256) -> Result<&Will, WillError> {
        let index = will_index(will_id)?;
        self.wills
            .get(&owner)
            .and_then(|list| list.get(index))
            .ok_or_else(|| revert("Will does not exist"))
    }
}

fn revert(reason: &str) -> WillError {
    WillError::Reverted(reason.to_string())
}

// ids are 1-based positions in the owner's list
fn will_index(will_id: U256) -> Result<usize, WillError> {
    if will_id.is_zero() || will_id > U256::from(usize::MAX as u64) {
        return Err(revert("Will does not exist"));
    }
    Ok(will_id.as_usize() - 1)
}

fn claimable_at(will: &Will, now: u64) -> bool {
    !will.claimed && U256::from(now) >= will.deadline()
}

/// Shared chain state; hand out per-account handles with [`SimulatedChain::connect`].
#[derive(Debug)]
pub struct SimulatedChain {
    contract_address: Address,
    state: Mutex<ChainState>,
}

impl SimulatedChain {
    pub fn new(genesis_timestamp: u64) -> Arc<Self> {
        let contract_address = Address::from_slice(&keccak256(b"DecentralizedWill")[12..]);
        info!(address = ?contract_address, genesis_timestamp, "Simulated chain started");
        Arc::new(Self {
            contract_address,
            state: Mutex::new(ChainState {
                timestamp: genesis_timestamp,
                block_number: 0,
                tx_count: 0,
                balances: HashMap::new(),
                contract_balance: U256::zero(),
                wills: HashMap::new(),
            }),
        })
    }

    /// Deterministic development accounts, each funded with `balance` wei.
    pub fn dev_accounts(&self, count: usize, balance: U256) -> Vec<Address> {
        let accounts: Vec<Address> = (0..count)
            .map(|i| Address::from_slice(&keccak256(format!("dev-account-{}", i))[12..]))
            .collect();
        for account in &accounts {
            self.fund(*account, balance);
        }
        accounts
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn connect(self: &Arc<Self>, sender: Address) -> SimulatedWillContract {
        SimulatedWillContract { chain: Arc::clone(self), sender: Some(sender) }
    }

    /// Handle with no sender; writes fail with `NoSigner`.
    pub fn read_only(self: &Arc<Self>) -> SimulatedWillContract {
        SimulatedWillContract { chain: Arc::clone(self), sender: None }
    }

    pub fn fund(&self, account: Address, amount: U256) {
        let mut state = self.state.lock();
        *state.balances.entry(account).or_default() += amount;
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.state.lock().balances.get(&account).copied().unwrap_or_default()
    }

    pub fn contract_balance(&self) -> U256 {
        self.state.lock().contract_balance
    }

    pub fn timestamp(&self) -> u64 {
        self.state.lock().timestamp
    }

    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }

    /// Moves the clock forward and mines an empty block.
    pub fn increase_time(&self, seconds: u64) {
        let mut state = self.state.lock();
        state.timestamp = state.timestamp.saturating_add(seconds);
        state.block_number += 1;
        debug!(timestamp = state.timestamp, block = state.block_number, "Time advanced");
    }
}

/// Contract handle bound to one sender on a [`SimulatedChain`].
#[derive(Debug, Clone)]
pub struct SimulatedWillContract {
    chain: Arc<SimulatedChain>,
    sender: Option<Address>,
}

impl SimulatedWillContract {
    fn require_sender(&self) -> Result<Address, WillError> {
        self.sender.ok_or(WillError::NoSigner)
    }
}

#[async_trait]
impl WillContract for SimulatedWillContract {
    fn address(&self) -> Address {
        self.chain.contract_address
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
        if beneficiary.is_zero() {
            return Err(revert("Invalid beneficiary"));
        }
        if inactivity_period.is_zero() {
            return Err(revert("Inactivity period must be greater than zero"));
        }
        if value.is_zero() {
            return Err(revert("Must send ETH to create a will"));
        }

        let mut state = self.chain.state.lock();
        state.debit(sender, value)?;
        let now = U256::from(state.timestamp);
        let list = state.wills.entry(sender).or_default();
        let will_id = U256::from(list.len() as u64 + 1);
        list.push(Will {
            will_id,
            beneficiary,
            last_check_in: now,
            inactivity_period,
            amount: value,
            claimed: false,
        });
        info!(owner = ?sender, %will_id, "Will created");
        Ok(state.mine(sender))
    }

    async fn add_to_will(&self, will_id: U256, value: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        let mut state = self.chain.state.lock();
        if state.will(sender, will_id)?.claimed {
            return Err(revert("Will already claimed"));
        }
        if value.is_zero() {
            return Err(revert("Must send ETH to add funds"));
        }
        state.debit(sender, value)?;
        let will = state.will_mut(sender, will_id)?;
        will.amount += value;
        Ok(state.mine(sender))
    }

    async fn get_all_wills(&self, owner: Address) -> Result<Vec<Will>, WillError> {
        Ok(self.chain.state.lock().wills.get(&owner).cloned().unwrap_or_default())
    }

    async fn is_claimable(&self, owner: Address, will_id: U256) -> Result<bool, WillError> {
        let state = self.chain.state.lock();
        let will = state.will(owner, will_id)?;
        Ok(claimable_at(will, state.timestamp))
    }

    async fn claim(&self, owner: Address, will_id: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        let mut state = self.chain.state.lock();
        let now = state.timestamp;
        let will = state.will_mut(owner, will_id)?;
        if will.claimed {
            return Err(revert("Will already claimed"));
        }
        if will.beneficiary != sender {
            return Err(revert("Only the beneficiary can claim"));
        }
        if !claimable_at(will, now) {
            return Err(revert("Will is not claimable yet"));
        }
        will.claimed = true;
        let amount = will.amount;
        state.contract_balance -= amount;
        *state.balances.entry(sender).or_default() += amount;
        info!(owner = ?owner, beneficiary = ?sender, %will_id, %amount, "Will claimed");
        Ok(state.mine(sender))
    }

    async fn heartbeat(&self, will_id: U256) -> Result<TxOutcome, WillError> {
        let sender = self.require_sender()?;
        let mut state = self.chain.state.lock();
        let now = U256::from(state.timestamp);
        let will = state.will_mut(sender, will_id)?;
        if will.claimed {
            return Err(revert("Will already claimed"));
        }
        will.last_check_in = now;
        debug!(owner = ?sender, %will_id, "Heartbeat recorded");
        Ok(state.mine(sender))
    }
}
