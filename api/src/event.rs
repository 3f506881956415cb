pub use alloy_primitives::{Log, LogData};

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::abi::ILeaderElection;
use crate::error::AbiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionEventKind {
    LeaderElected,
    RevealOn,
    ResetDone,
}

impl ElectionEventKind {
    pub const ALL: [ElectionEventKind; 3] = [
        ElectionEventKind::LeaderElected,
        ElectionEventKind::RevealOn,
        ElectionEventKind::ResetDone,
    ];

    pub fn signature(&self) -> &'static str {
        match self {
            ElectionEventKind::LeaderElected => ILeaderElection::leader_elected::SIGNATURE,
            ElectionEventKind::RevealOn => ILeaderElection::reveal_on::SIGNATURE,
            ElectionEventKind::ResetDone => ILeaderElection::reset_done::SIGNATURE,
        }
    }

    pub fn topic(&self) -> B256 {
        match self {
            ElectionEventKind::LeaderElected => ILeaderElection::leader_elected::SIGNATURE_HASH,
            ElectionEventKind::RevealOn => ILeaderElection::reveal_on::SIGNATURE_HASH,
            ElectionEventKind::ResetDone => ILeaderElection::reset_done::SIGNATURE_HASH,
        }
    }
}

/// Decoded event of the leader election contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionEvent {
    LeaderElected { leader: Address },
    RevealOn,
    ResetDone,
}

impl ElectionEvent {
    pub fn kind(&self) -> ElectionEventKind {
        match self {
            ElectionEvent::LeaderElected { .. } => ElectionEventKind::LeaderElected,
            ElectionEvent::RevealOn => ElectionEventKind::RevealOn,
            ElectionEvent::ResetDone => ElectionEventKind::ResetDone,
        }
    }

    /// Decodes a log. Returns `None` for logs of other events.
    pub fn decode(log: &Log) -> Result<Option<Self>, AbiError> {
        let topics = log.data.topics();
        let Some(topic0) = topics.first() else {
            return Ok(None);
        };
        let Some(kind) = ElectionEventKind::ALL.into_iter().find(|k| k.topic() == *topic0) else {
            return Ok(None);
        };
        let event = match kind {
            ElectionEventKind::LeaderElected => {
                // Deployments that index the leader carry it as the second topic.
                let leader = match topics.get(1) {
                    Some(indexed) => Address::from_word(*indexed),
                    None => ILeaderElection::leader_elected::decode_log(log, true)?.data.leader,
                };
                ElectionEvent::LeaderElected { leader }
            }
            ElectionEventKind::RevealOn => {
                ILeaderElection::reveal_on::decode_log(log, true)?;
                ElectionEvent::RevealOn
            }
            ElectionEventKind::ResetDone => {
                ILeaderElection::reset_done::decode_log(log, true)?;
                ElectionEvent::ResetDone
            }
        };
        Ok(Some(event))
    }
}
