//! Page-level controller: holds what the user typed, what was last loaded
//! from the contract and the single alert shown to the user, and turns
//! every contract or wallet failure into that alert.

use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::blockchain::WillContract;
use crate::core::validation::{parse_address, parse_ether_amount, parse_uint};
use crate::core::{Will, WillError};
use crate::i18n::Messages;
use crate::provider::WalletProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// Raw text of the "Create New Will" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WillForm {
    pub beneficiary: String,
    pub inactivity_period: String,
    pub amount: String,
    /// Lists and claims target this owner instead of the connected wallet.
    pub will_owner: String,
}

impl WillForm {
    fn clear_will_fields(&mut self) {
        self.beneficiary.clear();
        self.inactivity_period.clear();
        self.amount.clear();
    }
}

pub struct Dashboard {
    wallet: Arc<dyn WalletProvider>,
    contract_address: Address,
    messages: Messages,
    pub form: WillForm,
    wills: Vec<Will>,
    claimable: HashMap<U256, bool>,
    account: Option<Address>,
    alert: Option<Alert>,
    pinned: bool,
}

impl Dashboard {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        contract_address: Address,
        messages: Messages,
    ) -> Self {
        Self {
            wallet,
            contract_address,
            messages,
            form: WillForm::default(),
            wills: Vec::new(),
            claimable: HashMap::new(),
            account: None,
            alert: None,
            pinned: false,
        }
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn wills(&self) -> &[Will] {
        &self.wills
    }

    /// Last eligibility check for `will_id`; unknown ids count as not claimable.
    pub fn is_claimable(&self, will_id: U256) -> bool {
        self.claimable.get(&will_id).copied().unwrap_or(false)
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    /// Owner the will cards are evaluated against: the override when it
    /// parses, else the connected wallet.
    pub fn display_owner(&self) -> Option<Address> {
        let raw = self.form.will_owner.trim();
        if raw.is_empty() {
            self.account
        } else {
            parse_address(raw).ok().or(self.account)
        }
    }

    fn succeed(&mut self, key: &str) {
        self.alert = Some(Alert { kind: AlertKind::Success, message: self.messages.text(key) });
    }

    fn fail(&mut self, key: &str, err: &WillError) {
        warn!(error = %err, "{}", key);
        self.alert = Some(Alert {
            kind: AlertKind::Error,
            message: self.messages.text_with(key, &[("error", err.to_string())]),
        });
    }

    fn fail_plain(&mut self, key: &str) {
        self.alert = Some(Alert { kind: AlertKind::Error, message: self.messages.text(key) });
    }

    pub async fn connect_wallet(&mut self) {
        match self.wallet.request_accounts().await {
            Ok(accounts) => {
                self.account = accounts.first().copied();
                info!(account = ?self.account, "Wallet connected");
                self.succeed("alert-wallet-connected");
            }
            Err(WillError::WalletUnavailable) => self.fail_plain("alert-wallet-missing"),
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.fail_plain("alert-wallet-connect-failed");
            }
        }
    }

    /// Applies an account-change notification unless the account is pinned
    /// or the notification names the account already shown.
    pub fn handle_accounts_changed(&mut self, accounts: &[Address]) {
        if self.pinned {
            debug!("Account change ignored while pinned");
            return;
        }
        if accounts.first().copied() == self.account {
            return;
        }
        match accounts.first() {
            Some(first) => {
                self.account = Some(*first);
                self.succeed("alert-wallet-changed");
            }
            None => {
                self.account = None;
                self.fail_plain("alert-wallet-disconnected");
            }
        }
    }

    /// Pins or unpins the displayed account; unpinning adopts the wallet's
    /// current active account.
    pub async fn toggle_pin(&mut self) {
        if self.pinned {
            match self.wallet.accounts().await {
                Ok(accounts) if !accounts.is_empty() => {
                    self.account = Some(accounts[0]);
                    self.succeed("alert-wallet-switched");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Could not read wallet accounts"),
            }
        }
        self.pinned = !self.pinned;
    }

    /// Owner the list and claims target: the override when set, else the
    /// wallet's signer (authorizing the wallet if needed).
    pub async fn active_owner(&mut self) -> Result<Address, WillError> {
        let raw = self.form.will_owner.trim();
        if !raw.is_empty() {
            return parse_address(raw);
        }
        self.authorize().await
    }

    // Authorizing publishes the account list; showing the signer right away
    // turns that notification into a no-op so the operation's alert stays.
    async fn authorize(&mut self) -> Result<Address, WillError> {
        let signer = self.wallet.signer_address().await?;
        if self.account.is_none() || !self.pinned {
            self.account = Some(signer);
        }
        Ok(signer)
    }

    async fn signed_contract(&mut self) -> Result<Arc<dyn WillContract>, WillError> {
        self.authorize().await?;
        self.wallet.contract(self.contract_address).await
    }

    pub async fn create_will(&mut self) {
        self.alert = None;
        match self.try_create_will().await {
            Ok(()) => {
                self.succeed("alert-will-created");
                self.form.clear_will_fields();
                self.refresh().await;
            }
            Err(e) => self.fail("alert-will-create-failed", &e),
        }
    }

    async fn try_create_will(&mut self) -> Result<(), WillError> {
        let beneficiary = parse_address(&self.form.beneficiary)?;
        let period = parse_uint(&self.form.inactivity_period, "inactivity period")?;
        let value = parse_ether_amount(&self.form.amount)?;
        let contract = self.signed_contract().await?;
        let outcome = contract.set_will(beneficiary, period, value).await?;
        info!(tx_hash = ?outcome.tx_hash, "Will created");
        Ok(())
    }

    pub async fn add_funds(&mut self, will_id: U256, amount: &str) {
        self.alert = None;
        let result = async {
            let value = parse_ether_amount(amount)?;
            let contract = self.signed_contract().await?;
            contract.add_to_will(will_id, value).await
        }
        .await;
        match result {
            Ok(outcome) => {
                info!(tx_hash = ?outcome.tx_hash, %will_id, "Funds added");
                self.succeed("alert-funds-added");
                self.refresh().await;
            }
            Err(e) => self.fail("alert-funds-add-failed", &e),
        }
    }

    /// Re-fetches the owner's wills and their eligibility. Clears the alert first.
    pub async fn load_all_wills(&mut self) {
        self.alert = None;
        self.refresh().await;
    }

    // Keeps whatever alert is showing unless the fetch itself fails.
    async fn refresh(&mut self) {
        match self.fetch_wills().await {
            Ok((wills, claimable)) => {
                self.wills = wills;
                self.claimable = claimable;
            }
            Err(e) => self.fail("alert-wills-load-failed", &e),
        }
    }

    async fn fetch_wills(&mut self) -> Result<(Vec<Will>, HashMap<U256, bool>), WillError> {
        let owner = self.active_owner().await?;
        let contract = self.wallet.contract(self.contract_address).await?;
        let wills = contract.get_all_wills(owner).await?;
        debug!(owner = ?owner, count = wills.len(), "Loaded wills");

        let mut claimable = HashMap::with_capacity(wills.len());
        for will in &wills {
            let status = match contract.is_claimable(owner, will.will_id).await {
                Ok(status) => status,
                Err(e) => {
                    debug!(
                        will_id = %will.will_id,
                        error = %e,
                        "Eligibility check failed, treating as not claimable"
                    );
                    false
                }
            };
            claimable.insert(will.will_id, status);
        }
        Ok((wills, claimable))
    }

    pub async fn claim_will(&mut self, will_id: U256) {
        self.alert = None;
        let result = async {
            let owner = self.active_owner().await?;
            let contract = self.signed_contract().await?;
            contract.claim(owner, will_id).await
        }
        .await;
        match result {
            Ok(outcome) => {
                info!(tx_hash = ?outcome.tx_hash, %will_id, "Will claimed");
                self.succeed("alert-will-claimed");
                self.refresh().await;
            }
            Err(e) => self.fail("alert-will-claim-failed", &e),
        }
    }

    pub async fn send_heartbeat(&mut self, will_id: U256) {
        self.alert = None;
        let result = async {
            let contract = self.signed_contract().await?;
            contract.heartbeat(will_id).await
        }
        .await;
        match result {
            Ok(outcome) => {
                info!(tx_hash = ?outcome.tx_hash, %will_id, "Heartbeat sent");
                self.succeed("alert-heartbeat-sent");
                self.refresh().await;
            }
            Err(e) => self.fail("alert-heartbeat-failed", &e),
        }
    }
}
