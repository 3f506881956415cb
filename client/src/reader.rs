use groupbuy_api::prelude::*;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::gateway::GroupBuyContract;
use crate::provider::WalletProvider;

/// Outcome of a campaign read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignRead {
    NotFound,
    Found {
        snapshot: CampaignSnapshot,
        flags: PersonalFlags,
    },
}

/// Reads campaign `id` as seen by `caller`.
///
/// Issues `getProgress`, `hasCommitted`, `hasRefunded` and `campaigns` in that
/// order, stopping after the first read if the slot is unused. Any failing read
/// aborts the whole fetch.
pub async fn read_campaign<P: WalletProvider>(
    contract: &GroupBuyContract<'_, P>,
    id: u64,
    caller: Address,
) -> ClientResult<CampaignRead> {
    let progress = contract.progress(id).await?;
    if !progress.exists() {
        tracing::debug!("Campaign {} not found", id);
        return Ok(CampaignRead::NotFound);
    }
    let has_committed = contract.has_committed(id, caller).await?;
    let has_refunded = contract.has_refunded(id, caller).await?;
    let record = contract.campaign(id).await?;
    Ok(CampaignRead::Found {
        snapshot: CampaignSnapshot::from_reads(&progress, &record),
        flags: PersonalFlags {
            has_committed,
            has_refunded,
        },
    })
}

/// Transient view state of one campaign detail page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignState {
    pub id: u64,
    pub snapshot: Option<CampaignSnapshot>,
    pub flags: PersonalFlags,
    pub status: DisplayStatus,
    pub error: Option<String>,
    pub loading: bool,
}

impl CampaignState {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            snapshot: None,
            flags: PersonalFlags::default(),
            status: DisplayStatus::Loading,
            error: None,
            loading: true,
        }
    }

    /// Folds a read into the state. A failed read keeps the previous snapshot and
    /// flags, marks the status as Error and records the message.
    pub fn apply(&mut self, result: ClientResult<CampaignRead>, now: u64) {
        self.loading = false;
        match result {
            Ok(CampaignRead::NotFound) => {
                self.snapshot = None;
                self.flags = PersonalFlags::default();
                self.status = DisplayStatus::NotFound;
                self.error = None;
            }
            Ok(CampaignRead::Found { snapshot, flags }) => {
                self.status = derive_status(Some(&snapshot), &flags, now);
                self.snapshot = Some(snapshot);
                self.flags = flags;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Failed to fetch campaign {}: {}", self.id, e);
                self.status = DisplayStatus::Error;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn fail(&mut self, error: &ClientError) {
        self.error = Some(error.to_string());
    }

    pub fn progress_percent(&self) -> f64 {
        self.snapshot.map(|s| s.progress_percent()).unwrap_or_default()
    }

    pub fn can_refund(&self) -> bool {
        can_refund(self.status, &self.flags)
    }
}
