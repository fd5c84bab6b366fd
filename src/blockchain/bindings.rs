//! Typed bindings for the DecentralizedWill contract.

use ethers::prelude::abigen;
use ethers::types::{Address, U256};

abigen!(
    DecentralizedWillContract,
    r#"[
        struct Will { uint256 willId; address beneficiary; uint256 lastCheckIn; uint256 inactivityPeriod; uint256 amount; bool claimed; }
        function setWill(address beneficiary, uint256 inactivityPeriod) external payable
        function addToWill(uint256 willId) external payable
        function getAllWills(address owner) external view returns (Will[] memory)
        function isClaimable(address owner, uint256 willId) external view returns (bool)
        function claim(address owner, uint256 willId) external
        function heartbeat(uint256 willId) external
    ]"#
);

/// `getAllWills` element as decoded from the human-readable ABI:
/// `(willId, beneficiary, lastCheckIn, inactivityPeriod, amount, claimed)`.
pub type RawWill = (U256, Address, U256, U256, U256, bool);

impl From<RawWill> for crate::core::domain::Will {
    fn from(raw: RawWill) -> Self {
        let (will_id, beneficiary, last_check_in, inactivity_period, amount, claimed) = raw;
        crate::core::domain::Will {
            will_id,
            beneficiary,
            last_check_in,
            inactivity_period,
            amount,
            claimed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Will;

    #[test]
    fn test_raw_tuple_into_will() {
        let raw: RawWill = (
            U256::from(2u64),
            Address::repeat_byte(0x42),
            U256::from(1_700_000_000u64),
            U256::from(86_400u64),
            U256::exp10(18),
            true,
        );
        let will = Will::from(raw);
        assert_eq!(will.will_id, U256::from(2u64));
        assert_eq!(will.beneficiary, Address::repeat_byte(0x42));
        assert_eq!(will.deadline(), U256::from(1_700_086_400u64));
        assert_eq!(will.amount, U256::exp10(18));
        assert!(will.claimed);
    }
}
