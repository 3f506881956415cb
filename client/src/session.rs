use groupbuy_api::prelude::*;

use crate::error::{ClientError, ClientResult};
use crate::gateway::GroupBuyContract;
use crate::provider::WalletProvider;
use crate::reader::{read_campaign, CampaignState};
use crate::unix_now;

const COMMIT_INELIGIBLE: &str =
    "Cannot commit: check conditions (policy, committed status, campaign open).";
const REFUND_INELIGIBLE: &str =
    "Cannot refund: check conditions (campaign cancelled, committed status, not yet refunded).";

/// One campaign detail view: its state plus the commit and refund actions.
///
/// Every write is followed by a full re-read; nothing is patched locally.
pub struct CampaignSession<'p, P> {
    contract: GroupBuyContract<'p, P>,
    caller: Option<Address>,
    state: CampaignState,
    terms_accepted: bool,
    transacting: bool,
    clock: fn() -> u64,
}

impl<'p, P: WalletProvider> CampaignSession<'p, P> {
    pub fn new(contract: GroupBuyContract<'p, P>, caller: Option<Address>, id: u64) -> Self {
        Self {
            contract,
            caller,
            state: CampaignState::new(id),
            terms_accepted: false,
            transacting: false,
            clock: unix_now,
        }
    }

    /// Replaces the wall clock used for status derivation.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    pub fn id(&self) -> u64 {
        self.state.id
    }

    pub fn is_transacting(&self) -> bool {
        self.transacting
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn accept_terms(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn can_commit(&self) -> bool {
        self.state.snapshot.is_some()
            && can_commit(
                self.state.status,
                &self.state.flags,
                self.caller.is_some(),
                self.terms_accepted,
            )
    }

    pub fn can_refund(&self) -> bool {
        self.caller.is_some() && self.state.can_refund()
    }

    /// Re-reads the campaign. Failures end up in the state, not in the return value.
    pub async fn refresh(&mut self) -> &CampaignState {
        self.state.loading = true;
        let result = match self.caller {
            Some(caller) => read_campaign(&self.contract, self.state.id, caller).await,
            None => Err(ClientError::NotConnected),
        };
        self.state.apply(result, (self.clock)());
        &self.state
    }

    /// Commits to the campaign, paying its unit price, and refreshes after the
    /// transaction is mined.
    pub async fn commit(&mut self) -> ClientResult<B256> {
        let (Some(caller), Some(snapshot)) = (self.caller, self.state.snapshot) else {
            return Err(self.reject(COMMIT_INELIGIBLE));
        };
        if !self.can_commit() {
            return Err(self.reject(COMMIT_INELIGIBLE));
        }
        self.state.error = None;
        self.transacting = true;
        let result = self
            .contract
            .commit(caller, self.state.id, snapshot.unit_price)
            .await;
        let hash = self.settle(result, "Commit").await?;
        self.terms_accepted = false;
        Ok(hash)
    }

    /// Claims a refund from a failed campaign and refreshes after the transaction
    /// is mined.
    pub async fn refund(&mut self) -> ClientResult<B256> {
        let Some(caller) = self.caller else {
            return Err(self.reject(REFUND_INELIGIBLE));
        };
        if !self.can_refund() {
            return Err(self.reject(REFUND_INELIGIBLE));
        }
        self.state.error = None;
        self.transacting = true;
        let result = self.contract.refund(caller, self.state.id).await;
        self.settle(result, "Refund").await
    }

    fn reject(&mut self, reason: &'static str) -> ClientError {
        let error = ClientError::Ineligible(reason);
        self.state.fail(&error);
        error
    }

    /// Refreshes once a write is mined. A rejected, failed or reverted write only
    /// records its message.
    async fn settle(&mut self, result: ClientResult<B256>, action: &str) -> ClientResult<B256> {
        self.transacting = false;
        match result {
            Ok(hash) => {
                self.refresh().await;
                Ok(hash)
            }
            Err(e) => {
                tracing::error!("{} transaction failed: {}", action, e);
                self.state.fail(&e);
                Err(e)
            }
        }
    }
}
