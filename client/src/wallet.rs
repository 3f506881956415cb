use groupbuy_api::prelude::*;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::provider::WalletProvider;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalletState {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: Option<String>,
    pub network: Option<String>,
    pub balance: U256,
}

impl WalletState {
    pub fn disconnect(&mut self) {
        *self = WalletState::default();
    }

    pub fn require_address(&self) -> ClientResult<Address> {
        match (self.connected, self.address) {
            (true, Some(address)) => Ok(address),
            _ => Err(ClientError::NotConnected),
        }
    }
}

/// Human-readable name of a test network.
pub fn network_label(chain_id: &str) -> &'static str {
    match chain_id.to_ascii_lowercase().as_str() {
        CHAIN_ROPSTEN => "Ropsten Test Network",
        CHAIN_GOERLI => "Goerli Test Network",
        CHAIN_SEPOLIA => "Sepolia Test Network",
        _ => "Other Test Network",
    }
}

/// Connects to the wallet: accounts, chain id and balance of the first account.
///
/// `provider` is `None` when no wallet is installed. On any failure the state is
/// reset to disconnected and the error returned; nothing is retried.
pub async fn connect<P: WalletProvider>(
    provider: Option<&P>,
    state: &mut WalletState,
) -> ClientResult<()> {
    let result = match provider {
        Some(provider) => fetch_wallet(provider).await,
        None => Err(ClientError::ProviderMissing),
    };
    match result {
        Ok(connected) => {
            tracing::info!(
                "Wallet connected: {} on {}",
                connected.address.as_ref().map(short_address).unwrap_or_default(),
                connected.network.as_deref().unwrap_or_default()
            );
            *state = connected;
            Ok(())
        }
        Err(e) => {
            if e.is_user_rejection() {
                tracing::warn!("Wallet connection rejected: {}", e);
            } else {
                tracing::error!("Wallet connection failed: {}", e);
            }
            state.disconnect();
            Err(e)
        }
    }
}

async fn fetch_wallet<P: WalletProvider>(provider: &P) -> ClientResult<WalletState> {
    let accounts = provider.request_accounts().await?;
    let address = *accounts.first().ok_or(ClientError::NoAccounts)?;
    let chain_id = provider.request_chain_id().await?;
    let balance = provider.get_balance(address).await?;
    Ok(WalletState {
        connected: true,
        address: Some(address),
        network: Some(network_label(&chain_id).to_string()),
        chain_id: Some(chain_id),
        balance,
    })
}
