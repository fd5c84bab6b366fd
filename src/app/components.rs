//! Text renderers for the dashboard. Each one is a pure function of the
//! state it is handed; nothing here talks to the wallet or the contract.

use ethers::types::Address;

use super::dashboard::{Alert, AlertKind, Dashboard, WillForm};
use crate::core::domain::{format_address, format_amount, format_timestamp};
use crate::core::{Will, WillStatus};
use crate::i18n::Messages;

/// Boxed card with an optional title, aligned label/value rows and free lines.
#[derive(Debug, Clone, Default)]
pub struct InfoCard {
    pub title: Option<String>,
    pub items: Vec<(String, String)>,
    pub body: Vec<String>,
}

impl InfoCard {
    pub fn render(&self) -> String {
        let mut out = String::new();
        match &self.title {
            Some(title) => out.push_str(&format!("+- {}\n", title)),
            None => out.push_str("+-\n"),
        }
        let width = self.items.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        for (label, value) in &self.items {
            let pad = width - label.chars().count();
            out.push_str(&format!("| {}{}  {}\n", label, " ".repeat(pad), value));
        }
        for line in &self.body {
            out.push_str(&format!("| {}\n", line));
        }
        out.push_str("+-\n");
        out
    }
}

pub fn render_wallet_status(account: Option<Address>, pinned: bool, messages: &Messages) -> String {
    match account {
        Some(address) => {
            let mut line = messages.text_with(
                "wallet-connected-as",
                &[("address", format_address(&address))],
            );
            if pinned {
                line.push(' ');
                line.push_str(&messages.text("wallet-pinned"));
            }
            format!("{}\n  {}\n", line, messages.text("wallet-hint-pin"))
        }
        None => format!(
            "{}\n  {}\n",
            messages.text("wallet-not-connected"),
            messages.text("wallet-hint-connect")
        ),
    }
}

pub fn render_alert(alert: &Alert) -> String {
    let tag = match alert.kind {
        AlertKind::Success => "[ok]",
        AlertKind::Error => "[error]",
    };
    format!("{} {}\n", tag, alert.message)
}

pub fn render_form(form: &WillForm, messages: &Messages) -> String {
    let show = |value: &str| {
        if value.trim().is_empty() {
            messages.text("form-empty")
        } else {
            value.to_string()
        }
    };
    InfoCard {
        title: Some(messages.text("form-title")),
        items: vec![
            (messages.text("form-beneficiary"), show(&form.beneficiary)),
            (messages.text("form-period"), show(&form.inactivity_period)),
            (messages.text("form-amount"), show(&form.amount)),
            (messages.text("form-owner"), show(&form.will_owner)),
        ],
        body: Vec::new(),
    }
    .render()
}

/// What the viewer may do with one will.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WillActions {
    pub can_claim: bool,
    pub can_heartbeat: bool,
    /// Message key explaining the claim button state.
    pub claim_hint: &'static str,
}

/// One will as seen by the connected wallet.
#[derive(Debug, Clone, Copy)]
pub struct WillDetails<'a> {
    pub will: &'a Will,
    pub claimable: bool,
    pub wallet: Option<Address>,
    /// Owner the list was loaded for (override or wallet).
    pub owner: Option<Address>,
}

impl<'a> WillDetails<'a> {
    pub fn is_beneficiary(&self) -> bool {
        self.wallet.is_some_and(|w| w == self.will.beneficiary)
    }

    pub fn is_owner(&self) -> bool {
        matches!((self.wallet, self.owner), (Some(w), Some(o)) if w == o)
    }

    pub fn actions(&self) -> WillActions {
        let is_beneficiary = self.is_beneficiary();
        let claim_hint = if !is_beneficiary {
            "will-hint-not-beneficiary"
        } else if !self.claimable {
            "will-hint-not-claimable"
        } else if self.will.claimed {
            "will-hint-claimed"
        } else {
            "will-hint-claim"
        };
        WillActions {
            can_claim: self.claimable && is_beneficiary && !self.will.claimed,
            can_heartbeat: self.is_owner() && !self.will.claimed,
            claim_hint,
        }
    }

    pub fn status(&self) -> WillStatus {
        WillStatus::derive(self.will, self.claimable)
    }

    pub fn render(&self, messages: &Messages) -> String {
        let will = self.will;
        let actions = self.actions();
        let record_status = if will.claimed { "will-status-claimed" } else { "will-status-active" };

        let mut body = Vec::new();
        let claim_label = format!("[{}]", messages.text("will-button-claim"));
        if actions.can_claim {
            body.push(format!("{} {}", claim_label, messages.text(actions.claim_hint)));
        } else {
            body.push(format!(
                "{} ({}) {}",
                claim_label,
                messages.text("will-button-disabled"),
                messages.text(actions.claim_hint)
            ));
        }
        if actions.can_heartbeat {
            body.push(format!(
                "[{}] {}",
                messages.text("will-button-heartbeat"),
                messages.text("will-hint-heartbeat")
            ));
        }
        let badge = match self.status() {
            WillStatus::Claimable => "will-status-claimable",
            WillStatus::Claimed => "will-status-claimed",
            WillStatus::Active => "will-status-active",
        };
        body.push(format!("* {}", messages.text(badge)));

        InfoCard {
            title: Some(messages.text_with("will-card-title", &[("id", will.will_id.to_string())])),
            items: vec![
                (messages.text("will-field-id"), will.will_id.to_string()),
                (messages.text("will-field-beneficiary"), format_address(&will.beneficiary)),
                (messages.text("will-field-last-check-in"), format_timestamp(will.last_check_in)),
                (
                    messages.text("will-field-period"),
                    messages.text_with(
                        "will-field-period-value",
                        &[("seconds", will.inactivity_period.to_string())],
                    ),
                ),
                (messages.text("will-field-amount"), format_amount(will.amount)),
                (messages.text("will-field-status"), messages.text(record_status)),
            ],
            body,
        }
        .render()
    }
}

/// Full page: title, wallet, alert, form and the will list.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let messages = dashboard.messages();
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", messages.text("app-title")));
    out.push_str(&render_wallet_status(dashboard.account(), dashboard.pinned(), messages));
    if let Some(alert) = dashboard.alert() {
        out.push_str(&render_alert(alert));
    }
    out.push_str(&render_form(&dashboard.form, messages));

    let wills = dashboard.wills();
    if wills.is_empty() {
        out.push_str(
            &InfoCard {
                title: Some(messages.text("wills-empty-title")),
                items: Vec::new(),
                body: vec![messages.text("wills-empty-hint")],
            }
            .render(),
        );
    } else {
        out.push_str(&format!(
            "{}\n",
            messages.text_with("wills-title", &[("count", wills.len().to_string())])
        ));
        let owner = dashboard.display_owner();
        for will in wills {
            let details = WillDetails {
                will,
                claimable: dashboard.is_claimable(will.will_id),
                wallet: dashboard.account(),
                owner,
            };
            out.push_str(&details.render(messages));
        }
    }
    out
}
