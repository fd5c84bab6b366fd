use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use regex::Regex;
use sha3::{Digest, Keccak256};
use std::str::FromStr;

use crate::core::errors::WillError;

/// Validates an Ethereum address string.
pub fn validate_ethereum_address(address: &str) -> Result<(), WillError> {
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(WillError::InvalidAddress(format!(
            "'{}' is not a 0x-prefixed 20-byte hex address",
            address
        )));
    }
    let hex_regex =
        Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Hardcoded regex should always compile");
    if !hex_regex.is_match(address) {
        return Err(WillError::InvalidAddress(format!(
            "'{}' contains non-hex characters",
            address
        )));
    }
    // EIP-55: if mixed-case, enforce checksum. All-lower or all-upper acceptable for compatibility.
    let body = &address[2..];
    let is_all_lower = body.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = body.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(());
    }
    if !is_eip55_checksum_valid(address) {
        return Err(WillError::InvalidAddress(format!(
            "'{}' has an invalid EIP-55 checksum",
            address
        )));
    }
    Ok(())
}

fn is_eip55_checksum_valid(addr: &str) -> bool {
    let body = &addr[2..];
    let lower = body.to_lowercase();
    let mut keccak = Keccak256::new();
    keccak.update(lower.as_bytes());
    let hash = keccak.finalize();
    for (i, ch) in body.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - (i % 2)))) & 0x0f;
        match ch {
            'a'..='f' if nibble >= 8 => return false,
            'A'..='F' if nibble < 8 => return false,
            _ => {}
        }
    }
    true
}

/// Parses user input into an address, trimming surrounding whitespace.
pub fn parse_address(input: &str) -> Result<Address, WillError> {
    let trimmed = input.trim();
    validate_ethereum_address(trimmed)?;
    Address::from_str(trimmed).map_err(|e| WillError::InvalidAddress(e.to_string()))
}

/// Parses a decimal ether amount ("1.5") into wei.
pub fn parse_ether_amount(input: &str) -> Result<U256, WillError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WillError::InvalidAmount("amount is empty".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(WillError::InvalidAmount(format!("'{}' is negative", trimmed)));
    }
    parse_ether(trimmed).map_err(|e| WillError::InvalidAmount(format!("'{}': {}", trimmed, e)))
}

/// Parses a non-negative decimal integer (seconds, will ids).
pub fn parse_uint(input: &str, what: &str) -> Result<U256, WillError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(WillError::InvalidInput(format!(
            "{} must be a non-negative integer, got '{}'",
            what, trimmed
        )));
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| WillError::InvalidInput(format!("{} out of range: {}", what, e)))
}
