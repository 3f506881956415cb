use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::abi::{to_u64, IGroupBuy};
use crate::error::AbiError;

/// Raw `campaigns(id)` record as stored by the group buy contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// The account that opened this campaign. Zero for an unused slot.
    pub organizer: Address,

    /// The company that fulfils the order once the goal is reached.
    pub company: Address,

    /// Price of one unit, paid on commit.
    pub unit_price: U256,

    /// Number of commitments needed for the order to go through.
    pub goal: u64,

    /// Unix timestamp after which an unsuccessful campaign fails. Zero if unset.
    pub deadline: u64,

    /// Number of commitments so far.
    pub committed: u64,

    /// Whether the goal was reached.
    pub successful: bool,
}

impl CampaignRecord {
    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let r = IGroupBuy::campaignsCall::abi_decode_returns(data, true)?;
        Ok(Self {
            organizer: r.organizer,
            company: r.company,
            unit_price: r.unitPrice,
            goal: to_u64(r.goal)?,
            deadline: to_u64(r.deadline)?,
            committed: to_u64(r.committed)?,
            successful: r.successful,
        })
    }

    pub fn exists(&self) -> bool {
        !self.organizer.is_zero()
    }
}

/// `getProgress(id)` result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub organizer: Address,
    pub committed: u64,
    pub goal: u64,
    pub successful: bool,
    pub deadline: u64,
}

impl Progress {
    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let r = IGroupBuy::getProgressCall::abi_decode_returns(data, true)?;
        Ok(Self {
            organizer: r.organizer,
            committed: to_u64(r.committed)?,
            goal: to_u64(r.goal)?,
            successful: r.successful,
            deadline: to_u64(r.deadline)?,
        })
    }

    pub fn exists(&self) -> bool {
        !self.organizer.is_zero()
    }
}

/// A campaign as shown to the user, folded from a progress read and a record read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub organizer: Address,
    pub committed: u64,
    pub goal: u64,
    pub successful: bool,
    pub deadline: u64,
    pub unit_price: U256,
}

impl CampaignSnapshot {
    pub fn from_reads(progress: &Progress, record: &CampaignRecord) -> Self {
        Self {
            organizer: progress.organizer,
            committed: progress.committed,
            goal: progress.goal,
            successful: progress.successful,
            deadline: progress.deadline,
            unit_price: record.unit_price,
        }
    }

    /// Snapshot built from the raw record alone, for list views that skip the progress read.
    pub fn from_record(record: &CampaignRecord) -> Self {
        Self {
            organizer: record.organizer,
            committed: record.committed,
            goal: record.goal,
            successful: record.successful,
            deadline: record.deadline,
            unit_price: record.unit_price,
        }
    }

    /// Share of the goal committed so far, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (self.committed as f64 * 100.0 / self.goal as f64).min(100.0)
    }

    pub fn goal_reached(&self) -> bool {
        self.committed >= self.goal
    }
}

/// The caller's own standing in a campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalFlags {
    pub has_committed: bool,
    pub has_refunded: bool,
}
