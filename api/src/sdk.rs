use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::abi::{IGroupBuy, ILeaderElection};

/// Builds a `campaigns(id)` call.
pub fn campaigns(id: u64) -> Vec<u8> {
    IGroupBuy::campaignsCall { id: U256::from(id) }.abi_encode()
}

/// Builds a `getProgress(id)` call.
pub fn get_progress(id: u64) -> Vec<u8> {
    IGroupBuy::getProgressCall { id: U256::from(id) }.abi_encode()
}

/// Builds a `hasCommitted(id, user)` call.
pub fn has_committed(id: u64, user: Address) -> Vec<u8> {
    IGroupBuy::hasCommittedCall {
        id: U256::from(id),
        user,
    }
    .abi_encode()
}

/// Builds a `hasRefunded(id, user)` call.
pub fn has_refunded(id: u64, user: Address) -> Vec<u8> {
    IGroupBuy::hasRefundedCall {
        id: U256::from(id),
        user,
    }
    .abi_encode()
}

/// Builds a `commit` call that joins an existing campaign.
///
/// For a campaign that already has an organizer the contract ignores the
/// trailing arguments, so they are sent as zero.
pub fn commit(id: u64) -> Vec<u8> {
    IGroupBuy::commitCall {
        id: U256::from(id),
        company: Address::ZERO,
        unitPrice: U256::ZERO,
        goal: U256::ZERO,
        durationDays: U256::ZERO,
    }
    .abi_encode()
}

/// Builds a `commit` call that opens campaign `id` in an unused slot.
pub fn create_campaign(
    id: u64,
    company: Address,
    unit_price: U256,
    goal: u64,
    duration_days: u64,
) -> Vec<u8> {
    IGroupBuy::commitCall {
        id: U256::from(id),
        company,
        unitPrice: unit_price,
        goal: U256::from(goal),
        durationDays: U256::from(duration_days),
    }
    .abi_encode()
}

/// Builds a `refund(id)` call.
pub fn refund(id: u64) -> Vec<u8> {
    IGroupBuy::refundCall { id: U256::from(id) }.abi_encode()
}

/// Builds an election `Commit(hash)` call.
pub fn election_commit(hash: B256) -> Vec<u8> {
    ILeaderElection::CommitCall { hash }.abi_encode()
}

/// Builds an election `Reveal(value)` call.
pub fn election_reveal(value: U256) -> Vec<u8> {
    ILeaderElection::RevealCall { value }.abi_encode()
}

pub fn election_reset() -> Vec<u8> {
    ILeaderElection::election_resetCall {}.abi_encode()
}

pub fn get_leader() -> Vec<u8> {
    ILeaderElection::get_leaderCall {}.abi_encode()
}

/// Hash committed during the election commit phase and opened by `Reveal`.
pub fn commitment_hash(value: U256, salt: B256) -> B256 {
    keccak256((value, salt).abi_encode())
}
