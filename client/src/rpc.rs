#![allow(async_fn_in_trait)]

use std::sync::atomic::{AtomicU64, Ordering};

use groupbuy_api::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ClientError, ClientResult};
use crate::provider::{
    CallRequest, EventProvider, LogFilter, TransactionReceipt, TransactionRequest, WalletProvider,
};

#[derive(Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Vec<Value>,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl From<RpcError> for ClientError {
    fn from(error: RpcError) -> Self {
        rpc_error(error.code, error.message)
    }
}

/// Maps a provider error, singling out user rejections.
pub fn rpc_error(code: i64, message: String) -> ClientError {
    if code == USER_REJECTED_CODE {
        ClientError::UserRejected(message)
    } else {
        ClientError::Rpc { code, message }
    }
}

#[derive(Deserialize, Debug)]
struct RpcLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
}

impl From<RpcLog> for Log {
    fn from(log: RpcLog) -> Self {
        Log::new_unchecked(log.address, log.topics, log.data)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    block_number: Option<String>,
    /// Absent before Byzantium, where there is no revert flag.
    status: Option<String>,
}

impl TryFrom<RpcReceipt> for TransactionReceipt {
    type Error = ClientError;

    fn try_from(receipt: RpcReceipt) -> ClientResult<Self> {
        let block_number = receipt
            .block_number
            .as_deref()
            .map(|n| parse_quantity(n).and_then(to_u64))
            .transpose()?;
        let success = match receipt.status.as_deref() {
            Some(status) => !parse_quantity(status)?.is_zero(),
            None => true,
        };
        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number,
            success,
        })
    }
}

/// Carries one EIP-1193 style request to a provider.
pub trait Transport {
    async fn request(&self, method: &'static str, params: Vec<Value>) -> ClientResult<Value>;
}

/// JSON-RPC over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    async fn request(&self, method: &'static str, params: Vec<Value>) -> ClientResult<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let rpc_response: RpcResponse<Value> = response.json().await?;

        if let Some(error) = rpc_response.error {
            return Err(error.into());
        }

        Ok(rpc_response.result.unwrap_or(Value::Null))
    }
}

/// A wallet provider speaking the standard `eth_*` method set over any transport.
pub struct RpcProvider<T> {
    transport: T,
}

pub type HttpProvider = RpcProvider<HttpTransport>;

impl HttpProvider {
    pub fn http(url: impl Into<String>) -> Self {
        RpcProvider::new(HttpTransport::new(url))
    }
}

impl<T: Transport> RpcProvider<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<Value>,
    ) -> ClientResult<R> {
        let value = self.transport.request(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<T: Transport> WalletProvider for RpcProvider<T> {
    async fn request_accounts(&self) -> ClientResult<Vec<Address>> {
        // Plain nodes only know eth_accounts.
        let accounts: Vec<String> = match self
            .request::<Vec<String>>("eth_requestAccounts", vec![])
            .await
        {
            Err(ClientError::Rpc { code, .. }) if code == METHOD_NOT_FOUND_CODE => {
                self.request("eth_accounts", vec![]).await?
            }
            other => other?,
        };
        accounts
            .iter()
            .map(|a| a.parse::<Address>().map_err(|_| ClientError::Abi(AbiError::InvalidAddress(a.clone()))))
            .collect()
    }

    async fn request_chain_id(&self) -> ClientResult<String> {
        self.request("eth_chainId", vec![]).await
    }

    async fn get_balance(&self, address: Address) -> ClientResult<U256> {
        let balance: String = self
            .request("eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        Ok(parse_quantity(&balance)?)
    }

    async fn call(&self, request: CallRequest) -> ClientResult<Vec<u8>> {
        let mut call = json!({
            "to": request.to,
            "data": encode_hex(&request.data),
        });
        if let Some(from) = request.from {
            call["from"] = json!(from);
        }
        let result: String = self.request("eth_call", vec![call, json!("latest")]).await?;
        Ok(decode_hex(&result)?)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> ClientResult<B256> {
        let mut tx = json!({
            "from": request.from,
            "to": request.to,
            "data": encode_hex(&request.data),
        });
        if let Some(value) = request.value {
            tx["value"] = json!(to_quantity(value));
        }
        self.request("eth_sendTransaction", vec![tx]).await
    }

    async fn transaction_receipt(&self, hash: B256) -> ClientResult<Option<TransactionReceipt>> {
        let receipt: Option<RpcReceipt> = self
            .request("eth_getTransactionReceipt", vec![json!(hash)])
            .await?;
        receipt.map(TransactionReceipt::try_from).transpose()
    }
}

impl<T: Transport> EventProvider for RpcProvider<T> {
    async fn new_filter(&self, filter: LogFilter) -> ClientResult<String> {
        let topics: Vec<String> = filter.topics.iter().map(|t| encode_hex(t.as_slice())).collect();
        self.request(
            "eth_newFilter",
            vec![json!({
                "address": filter.address,
                "topics": [topics],
                "fromBlock": "latest",
            })],
        )
        .await
    }

    async fn filter_changes(&self, filter_id: &str) -> ClientResult<Vec<Log>> {
        let logs: Vec<RpcLog> = self
            .request("eth_getFilterChanges", vec![json!(filter_id)])
            .await?;
        Ok(logs.into_iter().map(Log::from).collect())
    }

    async fn uninstall_filter(&self, filter_id: &str) -> ClientResult<bool> {
        self.request("eth_uninstallFilter", vec![json!(filter_id)]).await
    }
}
