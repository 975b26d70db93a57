//! Indexer settings, read from the environment (after `dotenvy` has loaded
//! any `.env` file).
//!
//! | Variable             | Default                                | |
//! |----------------------|----------------------------------------|-|
//! | `POOL_CONTRACT_ID`   | required (`CONTRACT_ID` also accepted) | pool contract, `C...` strkey |
//! | `RPC_URL`            | `https://soroban-testnet.stellar.org`  | |
//! | `DATABASE_URL`       | `sqlite:./presale_events.db`           | |
//! | `API_PORT`           | `3001`                                 | |
//! | `POLL_INTERVAL_SECS` | `5`                                    | at least 1 |
//! | `EVENTS_PER_PAGE`    | `100`                                  | 1 to 10000 |
//! | `START_LEDGER`       | `0`                                    | used until a cursor is saved |
//! | `MAX_BACKOFF_SECS`   | `60`                                   | cap on RPC retry delay |

use std::fmt::Display;
use std::str::FromStr;

use crate::errors::{IndexerError, Result};

/// Largest `limit` Soroban RPC accepts for `getEvents`.
pub const MAX_EVENTS_PER_PAGE: u32 = 10_000;

const STRKEY_LEN: usize = 56;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub contract_id: String,
    pub database_url: String,
    pub api_port: u16,
    pub poll_interval_secs: u64,
    pub events_per_page: u32,
    pub start_ledger: u32,
    pub max_backoff_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let contract_id = lookup("POOL_CONTRACT_ID")
            .or_else(|| lookup("CONTRACT_ID"))
            .ok_or_else(|| IndexerError::config("POOL_CONTRACT_ID", "required"))?;
        if !is_strkey(&contract_id, &['C']) {
            return Err(IndexerError::config(
                "POOL_CONTRACT_ID",
                format!("`{contract_id}` is not a contract address"),
            ));
        }

        let poll_interval_secs = parsed(&lookup, "POLL_INTERVAL_SECS", 5u64)?;
        if poll_interval_secs == 0 {
            return Err(IndexerError::config("POLL_INTERVAL_SECS", "must be at least 1"));
        }

        let events_per_page = parsed(&lookup, "EVENTS_PER_PAGE", 100u32)?;
        if !(1..=MAX_EVENTS_PER_PAGE).contains(&events_per_page) {
            return Err(IndexerError::config(
                "EVENTS_PER_PAGE",
                format!("must be between 1 and {MAX_EVENTS_PER_PAGE}"),
            ));
        }

        Ok(Config {
            rpc_url: lookup("RPC_URL")
                .unwrap_or_else(|| "https://soroban-testnet.stellar.org".to_string()),
            contract_id,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./presale_events.db".to_string()),
            api_port: parsed(&lookup, "API_PORT", 3001u16)?,
            poll_interval_secs,
            events_per_page,
            start_ledger: parsed(&lookup, "START_LEDGER", 0u32)?,
            max_backoff_secs: parsed(&lookup, "MAX_BACKOFF_SECS", 60u64)?,
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| IndexerError::config(key, format!("`{raw}`: {e}"))),
    }
}

/// Shape check for a Stellar strkey (`G...` accounts, `C...` contracts).
/// The checksum is left to the RPC.
pub fn is_strkey(value: &str, prefixes: &[char]) -> bool {
    value.len() == STRKEY_LEN
        && value.starts_with(prefixes)
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}
