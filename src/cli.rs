use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Decentralized Will client (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "will-cli", about = "Create, fund, claim and keep alive DecentralizedWill wills")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to config.toml (defaults to $CONFIG_PATH, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Run against an in-process simulated chain instead of an RPC node
    #[arg(long, global = true)]
    pub simulate: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect the wallet and show its accounts
    Accounts,
    /// Create a will funded with the given amount
    Create {
        #[arg(long)]
        beneficiary: String,
        /// Inactivity period in seconds
        #[arg(long)]
        period: String,
        /// Amount in ETH
        #[arg(long)]
        amount: String,
    },
    /// List the wills of an owner (defaults to the connected wallet)
    List {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Add funds to one of your wills
    AddFunds {
        #[arg(long = "will-id")]
        will_id: String,
        /// Amount in ETH
        #[arg(long)]
        amount: String,
    },
    /// Claim a will you are the beneficiary of
    Claim {
        #[arg(long = "will-id")]
        will_id: String,
        /// Owner of the will (defaults to the connected wallet)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Reset the inactivity timer of one of your wills
    Heartbeat {
        #[arg(long = "will-id")]
        will_id: String,
    },
    /// Interactive dashboard
    Shell,
}
