use alloy_primitives::{address, Address};

/// Default JSON-RPC endpoint (local development node).
pub const RPC_URL: &str = "http://127.0.0.1:8545";

/// Default address of the group buy contract.
pub const GROUPBUY_CONTRACT: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

/// Default address of the leader election contract.
pub const ELECTION_CONTRACT: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");

/// Number of campaign slots scanned when the contract exposes no count.
pub const SCAN_LIMIT: u64 = 10;

/// Upper bound on slots read in one scan, whatever the contract reports.
pub const MAX_SCAN: u64 = 1_000;

/// Delay between transaction receipt polls.
pub const RECEIPT_POLL_MS: u32 = 1_000;

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code for an unsupported method.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

// Known test network chain ids.
pub const CHAIN_ROPSTEN: &str = "0x3";
pub const CHAIN_GOERLI: &str = "0x5";
pub const CHAIN_SEPOLIA: &str = "0xaa36a7";
