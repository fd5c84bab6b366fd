//! Deploys DecentralizedWill from its compiled artifact and records the address.
use anyhow::{Context, Result};
use clap::Parser;
use decentralized_will::core::config::{private_keys_from_env, AppConfig};
use decentralized_will::core::domain::checksum;
use decentralized_will::deploy::{deploy_contract, load_artifact, record_deployment, DEPLOYMENT_KEY};
use decentralized_will::provider::{LocalKeyWallet, WalletProvider};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "deploy", about = "Deploy the DecentralizedWill contract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hardhat artifact JSON (overrides contract.artifact_path)
    #[arg(long)]
    artifact: Option<PathBuf>,
    /// Directory for deployed_addresses.json (overrides contract.deployments_dir)
    #[arg(long)]
    deployments_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::load(args.config.as_deref())?;
    let artifact_path = args.artifact.unwrap_or_else(|| config.contract.artifact_path.clone());
    let deployments_dir =
        args.deployments_dir.unwrap_or_else(|| config.contract.deployments_dir.clone());

    let artifact = load_artifact(&artifact_path)?;

    let keys = private_keys_from_env();
    if keys.is_empty() {
        anyhow::bail!("WILL_PRIVATE_KEYS is not set; a deployer key is required");
    }
    let wallet = LocalKeyWallet::connect(&config.network, &keys).await?;
    let deployer = wallet.signer_address().await?;
    info!(deployer = %checksum(&deployer), chain_id = wallet.chain_id(), "Deploying");

    let client = wallet.signer_middleware()?;
    let address = deploy_contract(client, &artifact).await?;
    let record = record_deployment(&deployments_dir, wallet.chain_id(), DEPLOYMENT_KEY, address)
        .context("contract deployed but the address could not be recorded")?;

    println!("{}: {}", DEPLOYMENT_KEY, checksum(&address));
    println!("recorded in {}", record.display());
    Ok(())
}
