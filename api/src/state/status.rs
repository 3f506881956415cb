use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CampaignSnapshot, PersonalFlags};

/// What a campaign looks like to the current caller. Derived, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStatus {
    #[default]
    Loading,
    Open,
    Committed,
    Successful,
    Failed,
    NotFound,
    Error,
}

impl DisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Loading => "Loading",
            DisplayStatus::Open => "Open",
            DisplayStatus::Committed => "Committed",
            DisplayStatus::Successful => "Successful",
            DisplayStatus::Failed => "Failed",
            DisplayStatus::NotFound => "Not Found",
            DisplayStatus::Error => "Error",
        }
    }

    /// Wording used on the campaign detail view.
    pub fn detail_label(&self) -> &'static str {
        match self {
            DisplayStatus::Successful => "Order Confirmed",
            DisplayStatus::Failed => "Cancelled",
            other => other.label(),
        }
    }

    /// Successful and Failed campaigns never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DisplayStatus::Successful | DisplayStatus::Failed)
    }

    /// CSS-style slug, e.g. `order-confirmed`.
    pub fn slug(&self) -> String {
        self.detail_label().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives the display status. First match wins:
/// missing or zero organizer, successful, past a set deadline, committed, open.
pub fn derive_status(
    snapshot: Option<&CampaignSnapshot>,
    flags: &PersonalFlags,
    now: u64,
) -> DisplayStatus {
    let Some(snapshot) = snapshot.filter(|s| !s.organizer.is_zero()) else {
        return DisplayStatus::NotFound;
    };
    if snapshot.successful {
        DisplayStatus::Successful
    } else if snapshot.deadline != 0 && now > snapshot.deadline {
        DisplayStatus::Failed
    } else if flags.has_committed {
        DisplayStatus::Committed
    } else {
        DisplayStatus::Open
    }
}

/// Whether the commit action should be offered. The contract has the final say.
pub fn can_commit(status: DisplayStatus, flags: &PersonalFlags, connected: bool, terms_accepted: bool) -> bool {
    connected && terms_accepted && !flags.has_committed && status == DisplayStatus::Open
}

/// Whether the refund action should be offered. The contract has the final say.
pub fn can_refund(status: DisplayStatus, flags: &PersonalFlags) -> bool {
    status == DisplayStatus::Failed && flags.has_committed && !flags.has_refunded
}
