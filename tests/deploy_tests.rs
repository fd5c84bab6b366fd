// tests/deploy_tests.rs
// Artifact parsing and the deployment address record.

use decentralized_will::deploy::{
    load_artifact, read_deployment, record_deployment, ContractArtifact, DEPLOYMENT_KEY,
};
use ethers::types::Address;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const ARTIFACT: &str = r#"{
  "_format": "hh-sol-artifact-1",
  "contractName": "DecentralizedWill",
  "sourceName": "contracts/DecentralizedWill.sol",
  "abi": [
    {
      "inputs": [{ "internalType": "uint256", "name": "willId", "type": "uint256" }],
      "name": "heartbeat",
      "outputs": [],
      "stateMutability": "nonpayable",
      "type": "function"
    }
  ],
  "bytecode": "0x6080604052348015600f57600080fd5b50",
  "deployedBytecode": "0x6080",
  "linkReferences": {},
  "deployedLinkReferences": {}
}"#;

#[test]
fn test_hardhat_artifact_is_parsed() {
    let artifact = ContractArtifact::from_json(ARTIFACT).unwrap();
    assert_eq!(artifact.contract_name, "DecentralizedWill");
    assert!(artifact.abi.function("heartbeat").is_ok());
    assert_eq!(artifact.bytecode.len(), 17);
}

#[test]
fn test_load_artifact_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DecentralizedWill.json");
    std::fs::write(&path, ARTIFACT).unwrap();
    assert_eq!(load_artifact(&path).unwrap().contract_name, "DecentralizedWill");

    let err = load_artifact(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read artifact"), "{}", err);
}

#[test]
fn test_malformed_artifact_is_rejected() {
    assert!(ContractArtifact::from_json(r#"{"contractName":"X"}"#).is_err());
}

#[test]
fn test_record_then_read_per_chain() {
    let dir = tempfile::tempdir().unwrap();
    let local = Address::repeat_byte(0xaa);
    let sepolia = Address::repeat_byte(0xbb);

    let path = record_deployment(dir.path(), 31337, DEPLOYMENT_KEY, local).unwrap();
    record_deployment(dir.path(), 11155111, DEPLOYMENT_KEY, sepolia).unwrap();

    assert!(path.ends_with("chain-31337/deployed_addresses.json"));
    assert_eq!(read_deployment(dir.path(), 31337, DEPLOYMENT_KEY).unwrap(), Some(local));
    assert_eq!(read_deployment(dir.path(), 11155111, DEPLOYMENT_KEY).unwrap(), Some(sepolia));
    assert_eq!(read_deployment(dir.path(), 1, DEPLOYMENT_KEY).unwrap(), None);
}

#[test]
fn test_record_keeps_other_entries() {
    let dir = tempfile::tempdir().unwrap();
    let other = Address::repeat_byte(0x01);
    let will = Address::repeat_byte(0x02);
    record_deployment(dir.path(), 31337, "Token#Token", other).unwrap();
    let path = record_deployment(dir.path(), 31337, DEPLOYMENT_KEY, will).unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    let entries: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["Token#Token"], format!("{:?}", other));
    assert_eq!(read_deployment(dir.path(), 31337, DEPLOYMENT_KEY).unwrap(), Some(will));
}

#[test]
fn test_corrupt_record_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let chain_dir = dir.path().join("chain-31337");
    std::fs::create_dir_all(&chain_dir).unwrap();
    std::fs::write(chain_dir.join("deployed_addresses.json"), "{ not json").unwrap();
    assert!(read_deployment(dir.path(), 31337, DEPLOYMENT_KEY).is_err());
}
