#![allow(async_fn_in_trait)]

use groupbuy_api::prelude::{Address, Log, B256, U256};

use crate::error::ClientResult;

/// A read-only contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

/// A transaction for the wallet to sign and submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: Option<U256>,
    pub data: Vec<u8>,
}

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    /// False when the transaction reverted.
    pub success: bool,
}

/// Logs emitted by `address` whose first topic is any of `topics`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<B256>,
}

/// The wallet capability the client runs on.
///
/// In a browser this is the injected `window.ethereum` object; natively a
/// JSON-RPC node with managed accounts. Tests substitute a fake.
pub trait WalletProvider {
    /// Asks the user for account access. The first account is the caller.
    async fn request_accounts(&self) -> ClientResult<Vec<Address>>;

    /// Chain id as a `0x` quantity, e.g. `0xaa36a7`.
    async fn request_chain_id(&self) -> ClientResult<String>;

    async fn get_balance(&self, address: Address) -> ClientResult<U256>;

    /// Executes a read call and returns the raw return data.
    async fn call(&self, request: CallRequest) -> ClientResult<Vec<u8>>;

    /// Signs and submits a transaction, returning its hash. The transaction may still be pending.
    async fn send_transaction(&self, request: TransactionRequest) -> ClientResult<B256>;

    /// Receipt of a transaction, or `None` while it is pending.
    async fn transaction_receipt(&self, hash: B256) -> ClientResult<Option<TransactionReceipt>>;
}

/// Contract event filters.
pub trait EventProvider {
    /// Installs a filter and returns its id.
    async fn new_filter(&self, filter: LogFilter) -> ClientResult<String>;

    /// Logs matched since the previous poll of this filter.
    async fn filter_changes(&self, filter_id: &str) -> ClientResult<Vec<Log>>;

    async fn uninstall_filter(&self, filter_id: &str) -> ClientResult<bool>;
}
