use alloy_sol_types::SolCall;
use groupbuy_api::prelude::*;
use groupbuy_api::sdk;

use crate::error::{ClientError, ClientResult};
use crate::provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
use crate::sleep_ms;

/// A configured contract address bound to a wallet provider.
pub struct Contract<'p, P> {
    provider: &'p P,
    address: Address,
}

impl<'p, P> Clone for Contract<'p, P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider,
            address: self.address,
        }
    }
}

impl<'p, P: WalletProvider> Contract<'p, P> {
    pub fn new(provider: &'p P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &'p P {
        self.provider
    }

    /// Read call.
    pub async fn call(&self, from: Option<Address>, data: Vec<u8>) -> ClientResult<Vec<u8>> {
        self.provider
            .call(CallRequest {
                from,
                to: self.address,
                data,
            })
            .await
    }

    /// Write call. Resolves once the transaction is mined and returns its hash.
    ///
    /// A reverted transaction is an error.
    pub async fn send(&self, from: Address, data: Vec<u8>, value: Option<U256>) -> ClientResult<B256> {
        tracing::info!(
            "Sending transaction to {} from {} (value: {} ETH)",
            self.address,
            from,
            to_ether(value.unwrap_or_default())
        );
        let hash = self
            .provider
            .send_transaction(TransactionRequest {
                from,
                to: self.address,
                value,
                data,
            })
            .await?;
        tracing::info!("Transaction submitted: {}", hash);

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.success {
            tracing::error!("Transaction {} reverted", hash);
            return Err(ClientError::Reverted { hash });
        }
        tracing::info!(
            "Transaction {} mined in block {}",
            hash,
            receipt.block_number.unwrap_or_default()
        );
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> ClientResult<TransactionReceipt> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tracing::debug!("Transaction {} pending", hash);
            sleep_ms(RECEIPT_POLL_MS).await;
        }
    }
}

/// Typed handle on the group buy contract.
pub struct GroupBuyContract<'p, P> {
    contract: Contract<'p, P>,
}

impl<'p, P> Clone for GroupBuyContract<'p, P> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
        }
    }
}

impl<'p, P: WalletProvider> GroupBuyContract<'p, P> {
    pub fn new(provider: &'p P, address: Address) -> Self {
        Self {
            contract: Contract::new(provider, address),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn campaign(&self, id: u64) -> ClientResult<CampaignRecord> {
        let data = self.contract.call(None, sdk::campaigns(id)).await?;
        Ok(CampaignRecord::decode(&data)?)
    }

    pub async fn progress(&self, id: u64) -> ClientResult<Progress> {
        let data = self.contract.call(None, sdk::get_progress(id)).await?;
        Ok(Progress::decode(&data)?)
    }

    pub async fn has_committed(&self, id: u64, user: Address) -> ClientResult<bool> {
        let data = self.contract.call(Some(user), sdk::has_committed(id, user)).await?;
        Ok(IGroupBuy::hasCommittedCall::abi_decode_returns(&data, true)?._0)
    }

    pub async fn has_refunded(&self, id: u64, user: Address) -> ClientResult<bool> {
        let data = self.contract.call(Some(user), sdk::has_refunded(id, user)).await?;
        Ok(IGroupBuy::hasRefundedCall::abi_decode_returns(&data, true)?._0)
    }

    /// Reads a campaign count through a zero-argument method such as `campaignCount()`.
    pub async fn campaign_count(&self, method: &str) -> ClientResult<U256> {
        let data = self.contract.call(None, no_args_call(method)).await?;
        Ok(decode_uint(&data)?)
    }

    /// Joins campaign `id`, paying `unit_price`.
    pub async fn commit(&self, from: Address, id: u64, unit_price: U256) -> ClientResult<B256> {
        self.contract.send(from, sdk::commit(id), Some(unit_price)).await
    }

    /// Opens campaign `id`. The organizer pays the first unit.
    pub async fn create_campaign(
        &self,
        from: Address,
        id: u64,
        company: Address,
        unit_price: U256,
        goal: u64,
        duration_days: u64,
    ) -> ClientResult<B256> {
        let data = sdk::create_campaign(id, company, unit_price, goal, duration_days);
        self.contract.send(from, data, Some(unit_price)).await
    }

    pub async fn refund(&self, from: Address, id: u64) -> ClientResult<B256> {
        self.contract.send(from, sdk::refund(id), None).await
    }
}
