use alloy_primitives::{hex, keccak256, U256};
use alloy_sol_types::{sol, SolValue};

use crate::error::AbiError;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IGroupBuy {
        function campaigns(uint256 id) external view returns (
            address organizer,
            address company,
            uint256 unitPrice,
            uint256 goal,
            uint256 deadline,
            uint256 committed,
            bool successful
        );
        function getProgress(uint256 id) external view returns (
            address organizer,
            uint256 committed,
            uint256 goal,
            bool successful,
            uint256 deadline
        );
        function hasCommitted(uint256 id, address user) external view returns (bool);
        function hasRefunded(uint256 id, address user) external view returns (bool);

        // Opens the campaign when the slot is unused, joins it otherwise.
        function commit(
            uint256 id,
            address company,
            uint256 unitPrice,
            uint256 goal,
            uint256 durationDays
        ) external payable;
        function refund(uint256 id) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ILeaderElection {
        event leader_elected(address leader);
        event reveal_on();
        event reset_done();

        function Commit(bytes32 hash) external;
        function Reveal(uint256 value) external;
        function election_reset() external;
        function get_leader() external view returns (address);
    }
}

/// Call data for a zero-argument method given by its signature, e.g. `campaignCount()`.
pub fn no_args_call(signature: &str) -> Vec<u8> {
    keccak256(signature.as_bytes())[..4].to_vec()
}

/// Decodes return data holding a single `uint256`.
pub fn decode_uint(data: &[u8]) -> Result<U256, AbiError> {
    Ok(U256::abi_decode(data, true)?)
}

/// Narrows a `uint256` count or timestamp.
pub fn to_u64(value: U256) -> Result<u64, AbiError> {
    u64::try_from(value).map_err(|_| AbiError::Overflow(64))
}

/// Decodes `0x`-prefixed (or bare) hex data.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    hex::decode(s).map_err(|_| AbiError::InvalidHex(s.to_string()))
}

pub fn encode_hex(data: &[u8]) -> String {
    hex::encode_prefixed(data)
}

/// Parses a JSON-RPC quantity such as `"0x1bc16d674ec80000"`.
pub fn parse_quantity(s: &str) -> Result<U256, AbiError> {
    if !s.starts_with("0x") || s.len() == 2 {
        return Err(AbiError::InvalidHex(s.to_string()));
    }
    s.parse().map_err(|_| AbiError::InvalidHex(s.to_string()))
}

pub fn to_quantity(value: U256) -> String {
    format!("{:#x}", value)
}
