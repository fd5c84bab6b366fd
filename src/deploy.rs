//! Contract deployment: load the compiled Hardhat artifact, deploy it and
//! keep an Ignition-style record of where it landed.

use ethers::{
    abi::Abi,
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::WillError;

/// Key under which the contract address is recorded (`<module>#<contract>`).
pub const DEPLOYMENT_KEY: &str = "DecentralizedWill#DecentralizedWill";

const ADDRESSES_FILE: &str = "deployed_addresses.json";

/// The parts of a Hardhat compilation artifact needed to deploy.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName")]
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_json(content: &str) -> Result<Self, WillError> {
        let artifact: ContractArtifact = serde_json::from_str(content)?;
        if artifact.bytecode.is_empty() {
            return Err(WillError::DeploymentError(format!(
                "artifact for {} has no bytecode (abstract contract or interface?)",
                artifact.contract_name
            )));
        }
        Ok(artifact)
    }
}

pub fn load_artifact(path: &Path) -> Result<ContractArtifact, WillError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        WillError::DeploymentError(format!("Failed to read artifact {}: {}", path.display(), e))
    })?;
    ContractArtifact::from_json(&content)
}

/// Deploys the artifact with no constructor arguments and waits for the receipt.
pub async fn deploy_contract<M>(
    client: Arc<M>,
    artifact: &ContractArtifact,
) -> Result<Address, WillError>
where
    M: Middleware + 'static,
{
    info!(contract = %artifact.contract_name, "Deploying contract");
    let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), client);
    let deployer = factory
        .deploy(())
        .map_err(|e| WillError::DeploymentError(format!("Failed to build deployment: {}", e)))?;
    let contract = deployer
        .send()
        .await
        .map_err(|e| WillError::DeploymentError(format!("Deployment transaction failed: {}", e)))?;
    let address = contract.address();
    info!(contract = %artifact.contract_name, address = ?address, "Contract deployed");
    Ok(address)
}

fn addresses_path(deployments_dir: &Path, chain_id: u64) -> PathBuf {
    deployments_dir.join(format!("chain-{}", chain_id)).join(ADDRESSES_FILE)
}

fn read_addresses(path: &Path) -> Result<BTreeMap<String, String>, WillError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Records `address` under `key`, keeping the other entries of the file.
pub fn record_deployment(
    deployments_dir: &Path,
    chain_id: u64,
    key: &str,
    address: Address,
) -> Result<PathBuf, WillError> {
    let path = addresses_path(deployments_dir, chain_id);
    let mut addresses = read_addresses(&path)?;
    if let Some(previous) = addresses.get(key) {
        warn!(key, previous = %previous, "Overwriting recorded deployment");
    }
    addresses.insert(key.to_string(), format!("{:?}", address));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(&addresses)?)?;
    info!(path = %path.display(), key, "Deployment recorded");
    Ok(path)
}

pub fn read_deployment(
    deployments_dir: &Path,
    chain_id: u64,
    key: &str,
) -> Result<Option<Address>, WillError> {
    let path = addresses_path(deployments_dir, chain_id);
    match read_addresses(&path)?.get(key) {
        Some(raw) => Address::from_str(raw).map(Some).map_err(|e| {
            WillError::DeploymentError(format!(
                "Bad address for {} in {}: {}",
                key,
                path.display(),
                e
            ))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_without_bytecode_is_rejected() {
        let json = r#"{"contractName":"IWill","abi":[],"bytecode":"0x"}"#;
        let err = ContractArtifact::from_json(json).unwrap_err();
        assert!(err.to_string().contains("no bytecode"));
    }

    #[test]
    fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_deployment(dir.path(), 31337, DEPLOYMENT_KEY).unwrap(), None);
    }
}
