use std::str::FromStr;

use groupbuy_api::prelude::*;

use crate::error::{ClientError, ClientResult};
use crate::scanner::ScanConfig;

/// Endpoints and contract addresses the client runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: String,
    pub groupbuy_contract: Address,
    pub election_contract: Address,
    pub scan: ScanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: RPC_URL.to_string(),
            groupbuy_contract: GROUPBUY_CONTRACT,
            election_contract: ELECTION_CONTRACT,
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `RPC`, `GROUPBUY_CONTRACT`, `ELECTION_CONTRACT`,
    /// `SCAN_LIMIT` and `COUNT_METHOD`.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with variables read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Config::default();
        if let Some(url) = lookup("RPC") {
            config.rpc_url = url;
        }
        if let Some(address) = lookup("GROUPBUY_CONTRACT") {
            config.groupbuy_contract = parse("GROUPBUY_CONTRACT", &address)?;
        }
        if let Some(address) = lookup("ELECTION_CONTRACT") {
            config.election_contract = parse("ELECTION_CONTRACT", &address)?;
        }
        if let Some(limit) = lookup("SCAN_LIMIT") {
            config.scan.limit = parse("SCAN_LIMIT", &limit)?;
        }
        config.scan.count_method = lookup("COUNT_METHOD").filter(|m| !m.is_empty());
        Ok(config)
    }
}

fn parse<T>(name: &'static str, value: &str) -> ClientResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ClientError::Config {
        name,
        reason: e.to_string(),
    })
}
