use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("value does not fit in {0} bits")]
    Overflow(u32),

    #[error("abi decoding failed: {0}")]
    Decode(String),
}

impl From<alloy_sol_types::Error> for AbiError {
    fn from(e: alloy_sol_types::Error) -> Self {
        AbiError::Decode(e.to_string())
    }
}
