use groupbuy_api::error::AbiError;
use groupbuy_api::types::B256;
use thiserror::Error;

/// Failures surfaced to the user. Provider messages are passed through verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No wallet provider detected. Install MetaMask in your browser to proceed.")]
    ProviderMissing,

    #[error("{0}")]
    UserRejected(String),

    #[error("{message}")]
    Rpc { code: i64, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Transaction {hash} reverted.")]
    Reverted { hash: B256 },

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("{0}")]
    Ineligible(&'static str),

    #[error("Wallet not connected.")]
    NotConnected,

    #[error("Wallet returned no accounts.")]
    NoAccounts,

    #[error("Invalid {name}: {reason}")]
    Config { name: &'static str, reason: String },
}

impl ClientError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ClientError::UserRejected(_))
    }
}

impl From<alloy_sol_types::Error> for ClientError {
    fn from(e: alloy_sol_types::Error) -> Self {
        ClientError::Abi(e.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
