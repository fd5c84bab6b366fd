use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

use crate::core::{Will, WillError};

/// Result of a mined state-changing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
}

/// The DecentralizedWill contract as seen by the client.
///
/// A handle is bound to one contract address and, for writes, to the
/// account that signs (`msg.sender`). Handles without a sender are
/// read-only and return [`WillError::NoSigner`] from every write.
#[async_trait]
pub trait WillContract: Send + Sync {
    /// Address of the contract this handle talks to.
    fn address(&self) -> Address;

    /// Account that signs writes, if any.
    fn sender(&self) -> Option<Address>;

    /// Creates a will funded with `value` wei.
    async fn set_will(
        &self,
        beneficiary: Address,
        inactivity_period: U256,
        value: U256,
    ) -> Result<TxOutcome, WillError>;

    /// Adds `value` wei to one of the sender's wills.
    async fn add_to_will(&self, will_id: U256, value: U256) -> Result<TxOutcome, WillError>;

    async fn get_all_wills(&self, owner: Address) -> Result<Vec<Will>, WillError>;

    async fn is_claimable(&self, owner: Address, will_id: U256) -> Result<bool, WillError>;

    /// Pays out `owner`'s will to the sender, who must be its beneficiary.
    async fn claim(&self, owner: Address, will_id: U256) -> Result<TxOutcome, WillError>;

    /// Resets the inactivity timer of one of the sender's wills.
    async fn heartbeat(&self, will_id: U256) -> Result<TxOutcome, WillError>;
}
