use alloy_sol_types::SolCall;
use groupbuy_api::prelude::*;
use groupbuy_api::sdk;

use crate::error::{ClientError, ClientResult};
use crate::gateway::Contract;
use crate::provider::{EventProvider, LogFilter, WalletProvider};

/// Typed handle on the leader election contract.
pub struct ElectionContract<'p, P> {
    contract: Contract<'p, P>,
}

impl<'p, P: WalletProvider> ElectionContract<'p, P> {
    pub fn new(provider: &'p P, address: Address) -> Self {
        Self {
            contract: Contract::new(provider, address),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Submits the hash of `value` and `salt` for the commit phase.
    pub async fn commit(&self, from: Address, value: U256, salt: B256) -> ClientResult<B256> {
        let hash = sdk::commitment_hash(value, salt);
        self.contract.send(from, sdk::election_commit(hash), None).await
    }

    pub async fn reveal(&self, from: Address, value: U256) -> ClientResult<B256> {
        self.contract.send(from, sdk::election_reveal(value), None).await
    }

    pub async fn reset(&self, from: Address) -> ClientResult<B256> {
        self.contract.send(from, sdk::election_reset(), None).await
    }

    pub async fn leader(&self) -> ClientResult<Address> {
        let data = self.contract.call(None, sdk::get_leader()).await?;
        Ok(ILeaderElection::get_leaderCall::abi_decode_returns(&data, true)?._0)
    }
}

impl<'p, P: WalletProvider + EventProvider> ElectionContract<'p, P> {
    /// Subscribes to the given events. The caller owns the teardown.
    pub async fn subscribe(&self, kinds: &[ElectionEventKind]) -> ClientResult<EventSubscription<'p, P>> {
        let filter = LogFilter {
            address: self.contract.address(),
            topics: kinds.iter().map(|k| k.topic()).collect(),
        };
        let filter_id = self.contract.provider().new_filter(filter).await?;
        tracing::debug!("Installed event filter {}", filter_id);
        Ok(EventSubscription {
            provider: self.contract.provider(),
            filter_id,
            active: true,
        })
    }
}

/// A live event filter. Must be closed with [`EventSubscription::unsubscribe`].
pub struct EventSubscription<'p, P: EventProvider> {
    provider: &'p P,
    filter_id: String,
    active: bool,
}

impl<'p, P: EventProvider> EventSubscription<'p, P> {
    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// Events emitted since the last poll.
    ///
    /// Logs of unrelated events are skipped. A malformed log is logged and
    /// skipped, the rest of the batch is still returned.
    pub async fn poll(&self) -> ClientResult<Vec<ElectionEvent>> {
        let logs = self.provider.filter_changes(&self.filter_id).await?;
        let mut events = Vec::with_capacity(logs.len());
        for log in &logs {
            match ElectionEvent::decode(log) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    "Skipping undecodable log from {} on filter {}: {}",
                    log.address,
                    self.filter_id,
                    e
                ),
            }
        }
        Ok(events)
    }

    pub async fn unsubscribe(mut self) -> ClientResult<()> {
        self.active = false;
        let removed = self.provider.uninstall_filter(&self.filter_id).await?;
        if !removed {
            tracing::warn!("Event filter {} was already gone", self.filter_id);
        }
        Ok(())
    }
}

impl<'p, P: EventProvider> Drop for EventSubscription<'p, P> {
    fn drop(&mut self) {
        if self.active {
            tracing::warn!(
                "Event filter {} dropped without unsubscribe; it stays installed on the provider",
                self.filter_id
            );
        }
    }
}

/// Subscriptions owned by one view, torn down together when the view goes away.
pub struct SubscriptionSet<'p, P: EventProvider> {
    subscriptions: Vec<EventSubscription<'p, P>>,
}

impl<'p, P: EventProvider> Default for SubscriptionSet<'p, P> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }
}

impl<'p, P: EventProvider> SubscriptionSet<'p, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: EventSubscription<'p, P>) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Polls every subscription in order.
    ///
    /// A failing subscription does not stop the others. Its error is returned
    /// next to the events the rest produced.
    pub async fn poll(&self) -> (Vec<ElectionEvent>, Vec<ClientError>) {
        let mut events = Vec::new();
        let mut errors = Vec::new();
        for subscription in &self.subscriptions {
            match subscription.poll().await {
                Ok(polled) => events.extend(polled),
                Err(e) => {
                    tracing::warn!("Failed to poll event filter {}: {}", subscription.filter_id, e);
                    errors.push(e);
                }
            }
        }
        (events, errors)
    }

    /// Unsubscribes everything. All filters are attempted; the first error is returned.
    pub async fn dispose(self) -> ClientResult<()> {
        let mut first_error = None;
        for subscription in self.subscriptions {
            if let Err(e) = subscription.unsubscribe().await {
                tracing::error!("Failed to remove event filter: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
