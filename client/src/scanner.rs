use futures::future::join_all;
use groupbuy_api::prelude::*;
use serde::Serialize;

use crate::error::ClientResult;
use crate::gateway::GroupBuyContract;
use crate::provider::WalletProvider;

/// How the campaign list is scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Ids `0..limit` are read when no count method is configured.
    pub limit: u64,
    /// Zero-argument contract method returning the number of campaigns.
    pub count_method: Option<String>,
    /// Second pass reading progress and the caller's commitment per campaign.
    pub enrich: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            limit: SCAN_LIMIT,
            count_method: None,
            enrich: true,
        }
    }
}

/// One card on the campaign list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignEntry {
    pub id: u64,
    pub record: Option<CampaignRecord>,
    pub snapshot: Option<CampaignSnapshot>,
    pub has_committed: Option<bool>,
    pub status: DisplayStatus,
    pub error: Option<String>,
}

impl CampaignEntry {
    fn loading(id: u64, record: CampaignRecord) -> Self {
        Self {
            id,
            record: Some(record),
            snapshot: None,
            has_committed: None,
            status: DisplayStatus::Loading,
            error: None,
        }
    }

    fn failed(id: u64, message: String) -> Self {
        Self {
            id,
            record: None,
            snapshot: None,
            has_committed: None,
            status: DisplayStatus::Error,
            error: Some(message),
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.snapshot.map(|s| s.progress_percent()).unwrap_or_default()
    }
}

/// Lists campaigns in ascending id order.
///
/// All slots are read at once and unused ones dropped. A failing read
/// yields an Error entry for that id and never aborts the scan. When enabled,
/// a second concurrent pass derives each survivor's status for `caller`.
pub async fn scan_campaigns<P: WalletProvider>(
    contract: &GroupBuyContract<'_, P>,
    caller: Option<Address>,
    config: &ScanConfig,
    now: u64,
) -> Vec<CampaignEntry> {
    let bound = scan_bound(contract, config).await;

    let records = join_all((0..bound).map(|id| async move { (id, contract.campaign(id).await) })).await;

    let mut entries: Vec<CampaignEntry> = records
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(record) if record.exists() => Some(CampaignEntry::loading(id, record)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read campaign {}: {}", id, e);
                Some(CampaignEntry::failed(id, e.to_string()))
            }
        })
        .collect();

    match caller.filter(|_| config.enrich) {
        Some(caller) => {
            let details = join_all(
                entries
                    .iter()
                    .filter(|e| e.status == DisplayStatus::Loading)
                    .map(|e| e.id)
                    .map(|id| async move { (id, fetch_details(contract, id, caller).await) }),
            )
            .await;
            for (id, result) in details {
                let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
                    continue;
                };
                match result {
                    Ok((progress, has_committed)) => {
                        let record = entry.record.unwrap_or_default();
                        let snapshot = CampaignSnapshot::from_reads(&progress, &record);
                        let flags = PersonalFlags {
                            has_committed,
                            has_refunded: false,
                        };
                        entry.status = derive_status(Some(&snapshot), &flags, now);
                        entry.snapshot = Some(snapshot);
                        entry.has_committed = Some(has_committed);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch details of campaign {}: {}", id, e);
                        entry.status = DisplayStatus::Error;
                        entry.error = Some(e.to_string());
                    }
                }
            }
        }
        None => {
            for entry in entries.iter_mut().filter(|e| e.status == DisplayStatus::Loading) {
                if let Some(record) = entry.record {
                    let snapshot = CampaignSnapshot::from_record(&record);
                    entry.status = derive_status(Some(&snapshot), &PersonalFlags::default(), now);
                    entry.snapshot = Some(snapshot);
                }
            }
        }
    }

    tracing::debug!("Scanned {} slots, {} campaigns", bound, entries.len());
    entries
}

/// Number of slots to read: the contract's count if configured and readable,
/// the fixed limit otherwise. A count above `MAX_SCAN` is clamped.
async fn scan_bound<P: WalletProvider>(contract: &GroupBuyContract<'_, P>, config: &ScanConfig) -> u64 {
    let Some(method) = config.count_method.as_deref() else {
        return config.limit;
    };
    match contract.campaign_count(method).await {
        Ok(count) => match u64::try_from(count) {
            Ok(count) if count <= MAX_SCAN => count,
            _ => {
                tracing::warn!(
                    "Campaign count {} from {} exceeds {}, scanning ids below {} only",
                    count,
                    method,
                    MAX_SCAN,
                    MAX_SCAN
                );
                MAX_SCAN
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read campaign count via {}: {}", method, e);
            config.limit
        }
    }
}

async fn fetch_details<P: WalletProvider>(
    contract: &GroupBuyContract<'_, P>,
    id: u64,
    caller: Address,
) -> ClientResult<(Progress, bool)> {
    let progress = contract.progress(id).await?;
    let has_committed = contract.has_committed(id, caller).await?;
    Ok((progress, has_committed))
}
