use crate::errors::TickLensError;
use crate::lens::DEFAULT_MAX_CONCURRENT_READS;
use alloy_primitives::Address;
use std::str::FromStr;
use url::Url;

pub const RPC_URL_VAR: &str = "TICKLENS_RPC_URL";
pub const POOL_VAR: &str = "TICKLENS_POOL";
pub const RANGE_VAR: &str = "TICKLENS_RANGE";
pub const BLOCK_VAR: &str = "TICKLENS_BLOCK";
pub const MAX_CONCURRENT_READS_VAR: &str = "TICKLENS_MAX_CONCURRENT_READS";

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_RANGE_MULTIPLIER: i32 = 10;

/// Settings for one `ticklens` run.
#[derive(Debug, Clone, PartialEq)]
pub struct LensConfig {
    pub rpc_url: Url,
    pub pool: Address,
    pub range_multiplier: i32,
    /// Block to pin reads to; latest when unset.
    pub block: Option<u64>,
    pub max_concurrent_reads: usize,
}

impl LensConfig {
    pub fn from_env() -> Result<Self, TickLensError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TickLensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup(RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let rpc_url = Url::parse(&rpc_url)
            .map_err(|e| TickLensError::Config(format!("{RPC_URL_VAR}: {e}")))?;

        let pool = lookup(POOL_VAR)
            .ok_or_else(|| TickLensError::Config(format!("{POOL_VAR} is not set")))?;
        let pool = Address::from_str(pool.trim())
            .map_err(|e| TickLensError::Config(format!("{POOL_VAR}: {e}")))?;

        let range_multiplier = parse_var(&lookup, RANGE_VAR)?.unwrap_or(DEFAULT_RANGE_MULTIPLIER);
        let block = parse_var(&lookup, BLOCK_VAR)?;
        let max_concurrent_reads =
            parse_var(&lookup, MAX_CONCURRENT_READS_VAR)?.unwrap_or(DEFAULT_MAX_CONCURRENT_READS);
        if max_concurrent_reads == 0 {
            return Err(TickLensError::Config(format!(
                "{MAX_CONCURRENT_READS_VAR} must be at least 1"
            )));
        }

        Ok(Self {
            rpc_url,
            pool,
            range_multiplier,
            block,
            max_concurrent_reads,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, TickLensError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TickLensError::Config(format!("{key}: {e}")))
        })
        .transpose()
}
