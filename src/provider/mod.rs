//! Wallet adapter: the capabilities a browser wallet extension would offer
//! (account request, account-change notification, transaction signing),
//! served from a local keyring or from the simulated chain.

use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::watch;

use crate::blockchain::WillContract;
use crate::core::WillError;

pub mod accounts;
pub mod local;
pub mod simulated;

pub use accounts::AccountSet;
pub use local::LocalKeyWallet;
pub use simulated::SimulatedWallet;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Authorizes the client and returns its accounts, active first.
    async fn request_accounts(&self) -> Result<Vec<Address>, WillError>;

    /// Accounts visible without prompting; empty before authorization.
    async fn accounts(&self) -> Result<Vec<Address>, WillError>;

    /// Notifies every change of the visible account list.
    fn subscribe(&self) -> watch::Receiver<Vec<Address>>;

    /// Makes account `index` the active one.
    fn switch_account(&self, index: usize) -> Result<Address, WillError>;

    /// Revokes the client's authorization.
    fn disconnect(&self);

    /// Contract handle signed by the active account, or read-only when the
    /// client is not authorized.
    async fn contract(&self, address: Address) -> Result<Arc<dyn WillContract>, WillError>;

    /// Address that signs transactions; requests accounts first.
    async fn signer_address(&self) -> Result<Address, WillError> {
        self.request_accounts().await?.first().copied().ok_or(WillError::NoSigner)
    }
}
