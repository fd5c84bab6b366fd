//! Line-oriented front end for the dashboard.

use ethers::types::U256;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::components::render_dashboard;
use super::dashboard::Dashboard;
use crate::blockchain::SimulatedChain;
use crate::core::validation::parse_uint;
use crate::core::WillError;

pub const HELP: &str = "\
commands:
  connect                 connect the wallet
  disconnect              revoke the wallet connection
  use <index>             switch the wallet's active account
  pin                     pin / unpin the displayed account
  beneficiary <address>   set the beneficiary field
  period <seconds>        set the inactivity period field
  amount <eth>            set the amount field
  owner <address|->       list and claim another owner's wills (- clears)
  create                  create a will from the form
  load                    load all wills of the owner
  fund <id> <eth>         add funds to a will
  claim <id>              claim a will
  heartbeat <id>          send a heartbeat for a will
  advance <seconds>       move the simulated clock forward
  show                    redraw the dashboard
  help                    show this text
  quit                    leave
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Beneficiary,
    Period,
    Amount,
    Owner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Connect,
    Disconnect,
    Use(usize),
    Pin,
    Set(FormField, String),
    Create,
    Load,
    Fund { will_id: U256, amount: String },
    Claim(U256),
    Heartbeat(U256),
    Advance(u64),
    Show,
    Help,
    Quit,
}

fn arg<'a>(parts: &[&'a str], index: usize, usage: &str) -> Result<&'a str, WillError> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| WillError::InvalidInput(format!("usage: {}", usage)))
}

impl FromStr for ShellCommand {
    type Err = WillError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = parts.first() else {
            return Ok(ShellCommand::Show);
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "connect" => ShellCommand::Connect,
            "disconnect" => ShellCommand::Disconnect,
            "use" => {
                let raw = arg(&parts, 1, "use <index>")?;
                let index = raw
                    .parse::<usize>()
                    .map_err(|_| WillError::InvalidInput(format!("bad account index '{}'", raw)))?;
                ShellCommand::Use(index)
            }
            "pin" => ShellCommand::Pin,
            "beneficiary" => {
                let value = arg(&parts, 1, "beneficiary <address>")?;
                ShellCommand::Set(FormField::Beneficiary, value.to_string())
            }
            "period" => {
                let value = arg(&parts, 1, "period <seconds>")?;
                ShellCommand::Set(FormField::Period, value.to_string())
            }
            "amount" => {
                ShellCommand::Set(FormField::Amount, arg(&parts, 1, "amount <eth>")?.to_string())
            }
            "owner" => {
                let value = arg(&parts, 1, "owner <address|->")?;
                let value = if value == "-" { String::new() } else { value.to_string() };
                ShellCommand::Set(FormField::Owner, value)
            }
            "create" => ShellCommand::Create,
            "load" => ShellCommand::Load,
            "fund" => ShellCommand::Fund {
                will_id: parse_uint(arg(&parts, 1, "fund <id> <eth>")?, "will id")?,
                amount: arg(&parts, 2, "fund <id> <eth>")?.to_string(),
            },
            "claim" => ShellCommand::Claim(parse_uint(arg(&parts, 1, "claim <id>")?, "will id")?),
            "heartbeat" => {
                ShellCommand::Heartbeat(parse_uint(arg(&parts, 1, "heartbeat <id>")?, "will id")?)
            }
            "advance" => {
                let raw = arg(&parts, 1, "advance <seconds>")?;
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| {
                        WillError::InvalidInput(format!("bad number of seconds '{}'", raw))
                    })?;
                ShellCommand::Advance(secs)
            }
            "show" => ShellCommand::Show,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(WillError::InvalidInput(format!(
                    "unknown command '{}', type `help`",
                    other
                )))
            }
        };
        Ok(command)
    }
}

/// Drives `dashboard` from `input` until `quit` or end of input.
/// `clock` enables `advance` when running against the simulated chain.
pub async fn run_shell<R, W>(
    dashboard: &mut Dashboard,
    clock: Option<Arc<SimulatedChain>>,
    input: R,
    output: &mut W,
) -> Result<(), WillError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut notifications = dashboard.wallet().subscribe();
    notifications.borrow_and_update();

    write!(output, "{}", render_dashboard(dashboard))?;
    let mut lines = input.lines();
    loop {
        write!(output, "will> ")?;
        output.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                write!(output, "{}", HELP)?;
                continue;
            }
            ShellCommand::Show => {}
            ShellCommand::Connect => dashboard.connect_wallet().await,
            ShellCommand::Disconnect => dashboard.wallet().disconnect(),
            ShellCommand::Use(index) => {
                if let Err(e) = dashboard.wallet().switch_account(index) {
                    writeln!(output, "error: {}", e)?;
                    continue;
                }
            }
            ShellCommand::Pin => dashboard.toggle_pin().await,
            ShellCommand::Set(field, value) => match field {
                FormField::Beneficiary => dashboard.form.beneficiary = value,
                FormField::Period => dashboard.form.inactivity_period = value,
                FormField::Amount => dashboard.form.amount = value,
                FormField::Owner => dashboard.form.will_owner = value,
            },
            ShellCommand::Create => dashboard.create_will().await,
            ShellCommand::Load => dashboard.load_all_wills().await,
            ShellCommand::Fund { will_id, amount } => dashboard.add_funds(will_id, &amount).await,
            ShellCommand::Claim(will_id) => dashboard.claim_will(will_id).await,
            ShellCommand::Heartbeat(will_id) => dashboard.send_heartbeat(will_id).await,
            ShellCommand::Advance(secs) => match &clock {
                Some(chain) => {
                    chain.increase_time(secs);
                    writeln!(output, "clock advanced by {}s (now {})", secs, chain.timestamp())?;
                }
                None => {
                    writeln!(output, "error: `advance` only works with --simulate")?;
                    continue;
                }
            },
        }

        if notifications.has_changed().unwrap_or(false) {
            let accounts = notifications.borrow_and_update().clone();
            dashboard.handle_accounts_changed(&accounts);
        }
        write!(output, "{}", render_dashboard(dashboard))?;
    }
    Ok(())
}
