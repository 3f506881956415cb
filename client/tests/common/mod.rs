#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use alloy_sol_types::{SolCall, SolValue};
use groupbuy_api::prelude::*;
use groupbuy_client::*;

pub const NOW: u64 = 1_750_000_000;
pub const DAY: u64 = 86_400;
pub const PRICE: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);
pub const COUNT_METHOD: &str = "campaignCount()";

pub fn clock() -> u64 {
    NOW
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn user() -> Address {
    addr(0xaa)
}

pub fn organizer() -> Address {
    addr(0x11)
}

pub fn groupbuy_address() -> Address {
    addr(0x51)
}

pub fn election_address() -> Address {
    addr(0xe7)
}

pub fn record(committed: u64, goal: u64, successful: bool, deadline: u64) -> CampaignRecord {
    CampaignRecord {
        organizer: organizer(),
        company: addr(0x22),
        unit_price: PRICE,
        goal,
        deadline,
        committed,
        successful,
    }
}

fn reverted(message: impl Into<String>) -> ClientError {
    ClientError::Rpc {
        code: -32000,
        message: message.into(),
    }
}

/// A submitted transaction waiting to be mined.
struct PendingTx {
    method: &'static str,
    request: TransactionRequest,
    polls_left: u32,
}

#[derive(Default)]
struct ChainState {
    campaigns: BTreeMap<u64, CampaignRecord>,
    committers: HashSet<(u64, Address)>,
    refunded: HashSet<(u64, Address)>,
    campaign_count: Option<U256>,
    leader: Address,
    calls: Vec<&'static str>,
    sent: Vec<TransactionRequest>,
    pending: HashMap<B256, PendingTx>,
    receipts: HashMap<B256, TransactionReceipt>,
    pending_polls: u32,
    revert_sends: bool,
    block: u64,
    failing_reads: HashSet<u64>,
    send_error: Option<(i64, String)>,
    accounts_error: Option<(i64, String)>,
    filters: HashMap<String, LogFilter>,
    pending_logs: HashMap<String, Vec<Log>>,
    next_filter: u64,
}

/// In-memory stand-in for a wallet and both contracts.
///
/// Sent transactions stay pending until their receipt has been polled
/// `pending_polls` times; only then does the contract state change.
pub struct FakeChain {
    accounts: Vec<Address>,
    chain_id: String,
    balance: U256,
    state: RefCell<ChainState>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            accounts: vec![user()],
            chain_id: CHAIN_SEPOLIA.to_string(),
            balance: U256::from(1_500_000_000_000_000_000u128),
            state: RefCell::new(ChainState::default()),
        }
    }
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = chain_id.to_string();
        self
    }

    pub fn without_accounts(mut self) -> Self {
        self.accounts.clear();
        self
    }

    pub fn insert_campaign(&self, id: u64, record: CampaignRecord) {
        self.state.borrow_mut().campaigns.insert(id, record);
    }

    pub fn insert_committer(&self, id: u64, who: Address) {
        self.state.borrow_mut().committers.insert((id, who));
    }

    pub fn set_campaign_count(&self, count: U256) {
        self.state.borrow_mut().campaign_count = Some(count);
    }

    pub fn set_leader(&self, leader: Address) {
        self.state.borrow_mut().leader = leader;
    }

    /// Number of receipt polls answered with "pending" before a transaction is mined.
    pub fn set_pending_polls(&self, polls: u32) {
        self.state.borrow_mut().pending_polls = polls;
    }

    /// Mines every following transaction with a failed status.
    pub fn revert_sends(&self) {
        self.state.borrow_mut().revert_sends = true;
    }

    pub fn fail_reads_of(&self, id: u64) {
        self.state.borrow_mut().failing_reads.insert(id);
    }

    pub fn fail_sends(&self, code: i64, message: &str) {
        self.state.borrow_mut().send_error = Some((code, message.to_string()));
    }

    pub fn fail_accounts(&self, code: i64, message: &str) {
        self.state.borrow_mut().accounts_error = Some((code, message.to_string()));
    }

    pub fn campaign(&self, id: u64) -> Option<CampaignRecord> {
        self.state.borrow().campaigns.get(&id).copied()
    }

    /// Signatures of every method called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.borrow().sent.clone()
    }

    pub fn pending_transactions(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn installed_filters(&self) -> usize {
        self.state.borrow().filters.len()
    }

    /// Drops a filter on the node side, as a node does for filters left unpolled.
    pub fn forget_filter(&self, filter_id: &str) {
        let mut state = self.state.borrow_mut();
        state.filters.remove(filter_id);
        state.pending_logs.remove(filter_id);
    }

    /// Delivers an event log to every installed filter that matches it.
    pub fn emit(&self, log: Log) {
        let mut state = self.state.borrow_mut();
        let matching: Vec<String> = state
            .filters
            .iter()
            .filter(|(_, f)| {
                f.address == log.address
                    && log.data.topics().first().is_some_and(|t| f.topics.contains(t))
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in matching {
            state.pending_logs.entry(id).or_default().push(log.clone());
        }
    }

    fn record(&self, method: &'static str) {
        self.state.borrow_mut().calls.push(method);
    }

    fn read(&self, method: &'static str, data: &[u8]) -> ClientResult<Vec<u8>> {
        let state = self.state.borrow();
        if method == ILeaderElection::get_leaderCall::SIGNATURE {
            return Ok(state.leader.abi_encode());
        }
        if method == COUNT_METHOD {
            return match state.campaign_count {
                Some(count) => Ok(count.abi_encode()),
                None => Err(reverted("execution reverted")),
            };
        }
        let (id, who) = match method {
            m if m == IGroupBuy::campaignsCall::SIGNATURE => {
                (IGroupBuy::campaignsCall::abi_decode(data, true)?.id, None)
            }
            m if m == IGroupBuy::getProgressCall::SIGNATURE => {
                (IGroupBuy::getProgressCall::abi_decode(data, true)?.id, None)
            }
            m if m == IGroupBuy::hasCommittedCall::SIGNATURE => {
                let call = IGroupBuy::hasCommittedCall::abi_decode(data, true)?;
                (call.id, Some(call.user))
            }
            m if m == IGroupBuy::hasRefundedCall::SIGNATURE => {
                let call = IGroupBuy::hasRefundedCall::abi_decode(data, true)?;
                (call.id, Some(call.user))
            }
            _ => return Err(reverted("unknown method")),
        };
        let id = to_u64(id)?;
        if state.failing_reads.contains(&id) {
            return Err(reverted(format!("read of campaign {} failed", id)));
        }
        let record = state.campaigns.get(&id).copied().unwrap_or_default();
        let data = match (method, who) {
            (m, _) if m == IGroupBuy::campaignsCall::SIGNATURE => (
                record.organizer,
                record.company,
                record.unit_price,
                U256::from(record.goal),
                U256::from(record.deadline),
                U256::from(record.committed),
                record.successful,
            )
                .abi_encode_params(),
            (m, _) if m == IGroupBuy::getProgressCall::SIGNATURE => (
                record.organizer,
                U256::from(record.committed),
                U256::from(record.goal),
                record.successful,
                U256::from(record.deadline),
            )
                .abi_encode_params(),
            (m, Some(who)) if m == IGroupBuy::hasCommittedCall::SIGNATURE => {
                state.committers.contains(&(id, who)).abi_encode()
            }
            (_, Some(who)) => state.refunded.contains(&(id, who)).abi_encode(),
            _ => unreachable!(),
        };
        Ok(data)
    }

    fn execute(&self, method: &'static str, request: &TransactionRequest) -> ClientResult<()> {
        let mut state = self.state.borrow_mut();
        match method {
            m if m == IGroupBuy::commitCall::SIGNATURE => {
                let call = IGroupBuy::commitCall::abi_decode(&request.data, true)?;
                let id = to_u64(call.id)?;
                let goal = to_u64(call.goal)?;
                let days = to_u64(call.durationDays)?;
                let paid = request.value.unwrap_or_default();
                let from = request.from;
                let campaign = state.campaigns.entry(id).or_default();
                if campaign.exists() {
                    assert_eq!(paid, campaign.unit_price, "commit must pay the unit price");
                    campaign.committed += 1;
                    campaign.successful = campaign.committed >= campaign.goal;
                } else {
                    assert_eq!(paid, call.unitPrice, "organizer pays the first unit");
                    *campaign = CampaignRecord {
                        organizer: from,
                        company: call.company,
                        unit_price: call.unitPrice,
                        goal,
                        deadline: NOW + days * DAY,
                        committed: 1,
                        successful: goal <= 1,
                    };
                }
                state.committers.insert((id, from));
            }
            m if m == IGroupBuy::refundCall::SIGNATURE => {
                let id = to_u64(IGroupBuy::refundCall::abi_decode(&request.data, true)?.id)?;
                state.refunded.insert((id, request.from));
            }
            _ => {}
        }
        Ok(())
    }

    /// Mines a pending transaction, applying it unless sends are set to revert.
    fn mine(&self, hash: B256) -> ClientResult<TransactionReceipt> {
        let (tx, success, block) = {
            let mut state = self.state.borrow_mut();
            let Some(tx) = state.pending.remove(&hash) else {
                return Err(reverted("unknown transaction"));
            };
            state.block += 1;
            (tx, !state.revert_sends, state.block)
        };
        if success {
            self.execute(tx.method, &tx.request)?;
        }
        let receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(block),
            success,
        };
        self.state.borrow_mut().receipts.insert(hash, receipt);
        Ok(receipt)
    }
}

fn method_of(data: &[u8]) -> &'static str {
    const METHODS: [([u8; 4], &str); 10] = [
        (IGroupBuy::campaignsCall::SELECTOR, IGroupBuy::campaignsCall::SIGNATURE),
        (IGroupBuy::getProgressCall::SELECTOR, IGroupBuy::getProgressCall::SIGNATURE),
        (IGroupBuy::hasCommittedCall::SELECTOR, IGroupBuy::hasCommittedCall::SIGNATURE),
        (IGroupBuy::hasRefundedCall::SELECTOR, IGroupBuy::hasRefundedCall::SIGNATURE),
        (IGroupBuy::commitCall::SELECTOR, IGroupBuy::commitCall::SIGNATURE),
        (IGroupBuy::refundCall::SELECTOR, IGroupBuy::refundCall::SIGNATURE),
        (ILeaderElection::CommitCall::SELECTOR, ILeaderElection::CommitCall::SIGNATURE),
        (ILeaderElection::RevealCall::SELECTOR, ILeaderElection::RevealCall::SIGNATURE),
        (
            ILeaderElection::election_resetCall::SELECTOR,
            ILeaderElection::election_resetCall::SIGNATURE,
        ),
        (ILeaderElection::get_leaderCall::SELECTOR, ILeaderElection::get_leaderCall::SIGNATURE),
    ];
    if data.len() < 4 {
        return "unknown";
    }
    if data[..4] == no_args_call(COUNT_METHOD)[..] {
        return COUNT_METHOD;
    }
    METHODS
        .into_iter()
        .find(|(selector, _)| data[..4] == selector[..])
        .map(|(_, signature)| signature)
        .unwrap_or("unknown")
}

impl WalletProvider for FakeChain {
    async fn request_accounts(&self) -> ClientResult<Vec<Address>> {
        self.record("eth_requestAccounts");
        if let Some((code, message)) = self.state.borrow().accounts_error.clone() {
            return Err(rpc_error(code, message));
        }
        Ok(self.accounts.clone())
    }

    async fn request_chain_id(&self) -> ClientResult<String> {
        self.record("eth_chainId");
        Ok(self.chain_id.clone())
    }

    async fn get_balance(&self, _address: Address) -> ClientResult<U256> {
        self.record("eth_getBalance");
        Ok(self.balance)
    }

    async fn call(&self, request: CallRequest) -> ClientResult<Vec<u8>> {
        let method = method_of(&request.data);
        self.record(method);
        self.read(method, &request.data)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> ClientResult<B256> {
        let method = method_of(&request.data);
        self.record(method);
        let mut state = self.state.borrow_mut();
        if let Some((code, message)) = state.send_error.clone() {
            return Err(rpc_error(code, message));
        }
        state.sent.push(request.clone());
        let hash = B256::from(U256::from(state.sent.len()));
        let polls_left = state.pending_polls;
        state.pending.insert(
            hash,
            PendingTx {
                method,
                request,
                polls_left,
            },
        );
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> ClientResult<Option<TransactionReceipt>> {
        self.record("eth_getTransactionReceipt");
        {
            let mut state = self.state.borrow_mut();
            if let Some(receipt) = state.receipts.get(&hash) {
                return Ok(Some(*receipt));
            }
            if let Some(tx) = state.pending.get_mut(&hash) {
                if tx.polls_left > 0 {
                    tx.polls_left -= 1;
                    return Ok(None);
                }
            }
        }
        self.mine(hash).map(Some)
    }
}

impl EventProvider for FakeChain {
    async fn new_filter(&self, filter: LogFilter) -> ClientResult<String> {
        let mut state = self.state.borrow_mut();
        state.next_filter += 1;
        let id = format!("0x{:x}", state.next_filter);
        state.filters.insert(id.clone(), filter);
        Ok(id)
    }

    async fn filter_changes(&self, filter_id: &str) -> ClientResult<Vec<Log>> {
        let mut state = self.state.borrow_mut();
        if !state.filters.contains_key(filter_id) {
            return Err(reverted("filter not found"));
        }
        Ok(state.pending_logs.remove(filter_id).unwrap_or_default())
    }

    async fn uninstall_filter(&self, filter_id: &str) -> ClientResult<bool> {
        let mut state = self.state.borrow_mut();
        state.pending_logs.remove(filter_id);
        Ok(state.filters.remove(filter_id).is_some())
    }
}
