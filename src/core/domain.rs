//! Will record as returned by the contract, plus the display helpers the
//! dashboard and the CLI share.

use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use ethers::utils::{format_ether, to_checksum};
use serde::{Deserialize, Serialize};

/// One will entry owned by the contract. The client only ever displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Will {
    pub will_id: U256,
    pub beneficiary: Address,
    /// Unix seconds of the last heartbeat (or of creation).
    pub last_check_in: U256,
    /// Seconds of owner silence after which the will becomes claimable.
    pub inactivity_period: U256,
    /// Wei held for the beneficiary.
    pub amount: U256,
    pub claimed: bool,
}

impl Will {
    /// Timestamp from which the will is claimable, absent a heartbeat.
    pub fn deadline(&self) -> U256 {
        self.last_check_in.saturating_add(self.inactivity_period)
    }
}

/// Client-side status derived from the record and the last eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WillStatus {
    Active,
    Claimable,
    Claimed,
}

impl WillStatus {
    pub fn derive(will: &Will, claimable: bool) -> Self {
        if will.claimed {
            WillStatus::Claimed
        } else if claimable {
            WillStatus::Claimable
        } else {
            WillStatus::Active
        }
    }
}

/// `0x1234...abcd`, or `-` for the zero address.
pub fn format_address(address: &Address) -> String {
    if address.is_zero() {
        return "-".to_string();
    }
    let full = to_checksum(address, None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Full EIP-55 form of an address.
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Wei rendered as ether, trailing zeros trimmed but keeping one decimal.
pub fn format_amount(wei: U256) -> String {
    let raw = format_ether(wei);
    let trimmed = match raw.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", int)
            } else {
                format!("{}.{}", int, frac)
            }
        }
        None => format!("{}.0", raw),
    };
    format!("{} ETH", trimmed)
}

/// Unix seconds rendered as a UTC date-time; out-of-range values print raw.
pub fn format_timestamp(secs: U256) -> String {
    if secs > U256::from(i64::MAX as u64) {
        return secs.to_string();
    }
    match DateTime::<Utc>::from_timestamp(secs.as_u64() as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample(claimed: bool) -> Will {
        Will {
            will_id: U256::one(),
            beneficiary: Address::from_str("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap(),
            last_check_in: U256::from(1_700_000_000u64),
            inactivity_period: U256::from(86_400u64),
            amount: U256::exp10(18),
            claimed,
        }
    }

    #[test]
    fn test_deadline() {
        assert_eq!(sample(false).deadline(), U256::from(1_700_086_400u64));
    }

    #[test]
    fn test_status_claimed_wins() {
        assert_eq!(WillStatus::derive(&sample(true), true), WillStatus::Claimed);
        assert_eq!(WillStatus::derive(&sample(false), true), WillStatus::Claimable);
        assert_eq!(WillStatus::derive(&sample(false), false), WillStatus::Active);
    }

    #[test]
    fn test_format_address() {
        let addr = Address::from_str("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
        assert_eq!(format_address(&addr), "0x7099...79C8");
        assert_eq!(format_address(&Address::zero()), "-");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(U256::exp10(18)), "1.0 ETH");
        assert_eq!(format_amount(U256::from(1_500_000_000_000_000_000u128)), "1.5 ETH");
        assert_eq!(format_amount(U256::zero()), "0.0 ETH");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(U256::from(0u64)), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(U256::from(1_700_000_000u64)), "2023-11-14 22:13:20 UTC");
    }
}
