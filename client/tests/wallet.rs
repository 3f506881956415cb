mod common;

use common::*;
use groupbuy_api::prelude::*;
use groupbuy_client::*;

#[tokio::test]
async fn test_connect_without_provider() {
    let mut state = WalletState::default();
    let err = connect::<FakeChain>(None, &mut state).await.unwrap_err();
    assert!(matches!(err, ClientError::ProviderMissing));
    assert_eq!(
        err.to_string(),
        "No wallet provider detected. Install MetaMask in your browser to proceed."
    );
    assert!(!state.connected);
}

#[tokio::test]
async fn test_connect_reads_account_chain_and_balance() {
    let chain = FakeChain::new();
    let mut state = WalletState::default();
    connect(Some(&chain), &mut state).await.unwrap();

    assert!(state.connected);
    assert_eq!(state.address, Some(user()));
    assert_eq!(state.chain_id.as_deref(), Some("0xaa36a7"));
    assert_eq!(state.network.as_deref(), Some("Sepolia Test Network"));
    assert_eq!(to_ether(state.balance), "1.5");
    assert_eq!(state.require_address().unwrap(), user());
    assert_eq!(
        chain.calls(),
        vec!["eth_requestAccounts", "eth_chainId", "eth_getBalance"]
    );
}

#[tokio::test]
async fn test_unknown_chain_is_other_network() {
    let chain = FakeChain::new().with_chain_id("0x1");
    let mut state = WalletState::default();
    connect(Some(&chain), &mut state).await.unwrap();
    assert_eq!(state.network.as_deref(), Some("Other Test Network"));
}

#[tokio::test]
async fn test_rejection_resets_state_without_retry() {
    let chain = FakeChain::new();
    let mut state = WalletState::default();
    connect(Some(&chain), &mut state).await.unwrap();

    chain.fail_accounts(4001, "User rejected the request.");
    chain.clear_calls();
    let err = connect(Some(&chain), &mut state).await.unwrap_err();

    assert!(err.is_user_rejection());
    assert_eq!(err.to_string(), "User rejected the request.");
    assert_eq!(state, WalletState::default());
    assert_eq!(chain.calls(), vec!["eth_requestAccounts"]);
}

#[tokio::test]
async fn test_empty_account_list() {
    let chain = FakeChain::new().without_accounts();
    let mut state = WalletState::default();
    let err = connect(Some(&chain), &mut state).await.unwrap_err();
    assert!(matches!(err, ClientError::NoAccounts));
    assert!(matches!(state.require_address(), Err(ClientError::NotConnected)));
}
