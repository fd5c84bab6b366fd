// src/main.rs
//! Decentralized Will client entry point.
use anyhow::Result;
use clap::Parser;
use decentralized_will::app::{render_dashboard, run_shell, AlertKind, Dashboard};
use decentralized_will::blockchain::simulated::ether;
use decentralized_will::blockchain::SimulatedChain;
use decentralized_will::cli::{Cli, Commands};
use decentralized_will::core::config::{private_keys_from_env, AppConfig};
use decentralized_will::core::domain::checksum;
use decentralized_will::core::validation::parse_uint;
use decentralized_will::i18n::Messages;
use decentralized_will::provider::{LocalKeyWallet, SimulatedWallet, WalletProvider};
use ethers::types::Address;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Development accounts the simulated chain starts with.
const SIMULATED_ACCOUNTS: usize = 3;

/// Wallet, contract address and, on the simulated chain, its clock.
type Backend = (Arc<dyn WalletProvider>, Address, Option<Arc<SimulatedChain>>);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;
    info!("Starting will-cli v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.config.as_deref())?;
    let messages = Messages::bundled(&config.ui.language)?;

    let (wallet, contract_address, clock): Backend = if cli.simulate {
        let chain = SimulatedChain::new(chrono::Utc::now().timestamp().max(0) as u64);
        let accounts = chain.dev_accounts(SIMULATED_ACCOUNTS, ether(10_000));
        for (index, account) in accounts.iter().enumerate() {
            info!(index, account = %checksum(account), "Simulated account");
        }
        let address = chain.contract_address();
        let wallet: Arc<dyn WalletProvider> =
            Arc::new(SimulatedWallet::new(Arc::clone(&chain), accounts));
        (wallet, address, Some(chain))
    } else {
        let keys = private_keys_from_env();
        let wallet = LocalKeyWallet::connect(&config.network, &keys).await?;
        let address = config.contract_address(wallet.chain_id())?;
        let wallet: Arc<dyn WalletProvider> = Arc::new(wallet);
        (wallet, address, None)
    };
    info!(contract = %checksum(&contract_address), "Using DecentralizedWill contract");

    let mut dashboard = Dashboard::new(Arc::clone(&wallet), contract_address, messages);

    match cli.command {
        Commands::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut output = std::io::stdout();
            run_shell(&mut dashboard, clock, input, &mut output).await?;
            return Ok(());
        }
        Commands::Accounts => {
            dashboard.connect_wallet().await;
            for (index, account) in wallet.accounts().await?.iter().enumerate() {
                println!("{}: {}", index, checksum(account));
            }
        }
        Commands::Create { beneficiary, period, amount } => {
            dashboard.connect_wallet().await;
            dashboard.form.beneficiary = beneficiary;
            dashboard.form.inactivity_period = period;
            dashboard.form.amount = amount;
            dashboard.create_will().await;
        }
        Commands::List { owner } => {
            dashboard.form.will_owner = owner.unwrap_or_default();
            dashboard.connect_wallet().await;
            dashboard.load_all_wills().await;
        }
        Commands::AddFunds { will_id, amount } => {
            let will_id = parse_uint(&will_id, "will id")?;
            dashboard.connect_wallet().await;
            dashboard.add_funds(will_id, &amount).await;
        }
        Commands::Claim { will_id, owner } => {
            let will_id = parse_uint(&will_id, "will id")?;
            dashboard.form.will_owner = owner.unwrap_or_default();
            dashboard.connect_wallet().await;
            dashboard.claim_will(will_id).await;
        }
        Commands::Heartbeat { will_id } => {
            let will_id = parse_uint(&will_id, "will id")?;
            dashboard.connect_wallet().await;
            dashboard.send_heartbeat(will_id).await;
        }
    }

    print!("{}", render_dashboard(&dashboard));

    match dashboard.alert() {
        Some(alert) if alert.kind == AlertKind::Error => {
            Err(anyhow::anyhow!(alert.message.clone()))
        }
        _ => Ok(()),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info"));

    // stdout belongs to the rendered dashboard
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
