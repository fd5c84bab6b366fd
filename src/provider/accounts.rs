use ethers::types::Address;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::core::WillError;

#[derive(Debug)]
struct AccountState {
    accounts: Vec<Address>,
    active: usize,
    connected: bool,
}

/// Account bookkeeping shared by the wallet implementations: which accounts
/// exist, which one is active, whether the client was authorized, and the
/// watch channel that broadcasts what the client may see.
#[derive(Debug)]
pub struct AccountSet {
    state: Mutex<AccountState>,
    notifier: watch::Sender<Vec<Address>>,
}

impl AccountSet {
    pub fn new(accounts: Vec<Address>) -> Self {
        let (notifier, _) = watch::channel(Vec::new());
        Self {
            state: Mutex::new(AccountState { accounts, active: 0, connected: false }),
            notifier,
        }
    }

    fn exposed(state: &AccountState) -> Vec<Address> {
        if !state.connected || state.accounts.is_empty() {
            return Vec::new();
        }
        let mut ordered = Vec::with_capacity(state.accounts.len());
        ordered.push(state.accounts[state.active]);
        ordered.extend(
            state.accounts.iter().enumerate().filter(|(i, _)| *i != state.active).map(|(_, a)| *a),
        );
        ordered
    }

    // only real changes reach subscribers
    fn publish(&self, exposed: Vec<Address>) {
        self.notifier.send_if_modified(|current| {
            if *current == exposed {
                return false;
            }
            debug!(count = exposed.len(), "Publishing account change");
            *current = exposed;
            true
        });
    }

    /// Authorizes the client and returns the accounts, active first.
    pub fn request(&self) -> Result<Vec<Address>, WillError> {
        let exposed = {
            let mut state = self.state.lock();
            if state.accounts.is_empty() {
                return Err(WillError::WalletUnavailable);
            }
            if !state.connected {
                state.connected = true;
                info!(active = ?state.accounts[state.active], "Wallet authorized");
            }
            Self::exposed(&state)
        };
        self.publish(exposed.clone());
        Ok(exposed)
    }

    /// Accounts visible without authorization prompt; empty until `request`.
    pub fn exposed_accounts(&self) -> Vec<Address> {
        Self::exposed(&self.state.lock())
    }

    pub fn active(&self) -> Option<Address> {
        let state = self.state.lock();
        if state.connected {
            state.accounts.get(state.active).copied()
        } else {
            None
        }
    }

    pub fn switch(&self, index: usize) -> Result<Address, WillError> {
        let (address, exposed) = {
            let mut state = self.state.lock();
            let address = *state.accounts.get(index).ok_or_else(|| {
                WillError::InvalidInput(format!(
                    "account index {} out of range (wallet has {})",
                    index,
                    state.accounts.len()
                ))
            })?;
            state.active = index;
            (address, Self::exposed(&state))
        };
        info!(account = ?address, "Active account switched");
        // nothing is exposed before authorization, so nothing to announce
        if !exposed.is_empty() {
            self.publish(exposed);
        }
        Ok(address)
    }

    pub fn disconnect(&self) {
        let was_connected = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.connected, false)
        };
        if was_connected {
            info!("Wallet disconnected");
            self.publish(Vec::new());
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Address>> {
        self.notifier.subscribe()
    }

    pub fn all(&self) -> Vec<Address> {
        self.state.lock().accounts.clone()
    }
}
