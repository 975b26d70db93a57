//! Soroban RPC access: pages through `getEvents` for one pool contract and
//! decodes the results into [`PoolEvent`]s.
//!
//! Network failures, rate limits and soft RPC errors are retried with
//! exponential back-off, capped at `MAX_BACKOFF_SECS` from the config.
//! Malformed requests (`-32600`, `-32601`) fail immediately.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, PoolEvent};

const INITIAL_BACKOFF_SECS: u64 = 2;
const DEFAULT_MAX_BACKOFF_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<EventsPage>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// One page of `getEvents` output.
#[derive(Debug, Deserialize)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topics as rendered by the RPC, one JSON value per entry.
    pub topic: Vec<String>,
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
}

/// `getEvents` endpoint scoped to a single contract.
pub struct EventSource {
    client: Client,
    rpc_url: String,
    contract_id: String,
    max_backoff_secs: u64,
}

impl EventSource {
    pub fn new(client: Client, rpc_url: impl Into<String>, contract_id: impl Into<String>) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
            contract_id: contract_id.into(),
            max_backoff_secs: DEFAULT_MAX_BACKOFF_SECS,
        }
    }

    pub fn with_max_backoff(mut self, secs: u64) -> Self {
        self.max_backoff_secs = secs.max(INITIAL_BACKOFF_SECS);
        self
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Fetch up to `limit` events, from `start_ledger` or continuing `cursor`.
    pub async fn fetch_page(
        &self,
        start_ledger: u32,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<EventsPage> {
        let mut backoff = INITIAL_BACKOFF_SECS;
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getEvents",
            "params": page_params(&self.contract_id, start_ledger, cursor, limit),
        });

        loop {
            let response = match self.client.post(&self.rpc_url).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("getEvents request failed, retrying in {backoff}s: {e}");
                    backoff = self.wait(backoff).await;
                    continue;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                warn!("getEvents rate-limited, retrying in {backoff}s");
                backoff = self.wait(backoff).await;
                continue;
            }

            let reply: RpcResponse = response.json().await?;
            if let Some(err) = reply.error {
                if err.code == -32600 || err.code == -32601 {
                    return Err(IndexerError::RpcRejected {
                        code: err.code,
                        message: err.message,
                    });
                }
                warn!(
                    "getEvents soft error {}, retrying in {backoff}s: {}",
                    err.code, err.message
                );
                backoff = self.wait(backoff).await;
                continue;
            }

            let page = reply.result.ok_or(IndexerError::EmptyReply)?;
            debug!(
                events = page.events.len(),
                latest_ledger = ?page.latest_ledger,
                "fetched event page"
            );
            return Ok(page);
        }
    }

    async fn wait(&self, backoff: u64) -> u64 {
        tokio::time::sleep(Duration::from_secs(backoff)).await;
        next_backoff(backoff, self.max_backoff_secs)
    }
}

fn next_backoff(backoff: u64, max: u64) -> u64 {
    backoff.saturating_mul(2).min(max)
}

fn page_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [{ "type": "contract", "contractIds": [contract_id] }],
        "pagination": { "limit": limit },
    });
    match cursor {
        Some(cursor) => params["pagination"]["cursor"] = json!(cursor),
        None => params["startLedger"] = json!(start_ledger),
    }
    params
}

// ─────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────

pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<PoolEvent> {
    raw.iter()
        .filter_map(|event| decode_single(event, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<PoolEvent> {
    let kind = EventKind::from_topic(&topic_value(raw.topic.first()?));
    let key = raw.topic.get(1).map(|t| topic_value(t));
    let (participant, asset, amount) = decode_data(kind, key, &raw.value);

    Some(PoolEvent {
        event_id: raw.id.clone(),
        event_type: kind.as_str().to_string(),
        participant,
        asset,
        amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

type Decoded = (Option<String>, Option<String>, Option<String>);

/// Split an event into `(participant, asset, amount)` using its topic key and
/// payload fields.
fn decode_data(kind: EventKind, key: Option<String>, value: &Value) -> Decoded {
    let amount = || field(value, &["amount"]);
    match kind {
        EventKind::Deposited | EventKind::Withdrawn | EventKind::Reimbursed => (key, None, amount()),
        EventKind::WhitelistChanged => (key, None, None),
        EventKind::PayoutSent | EventKind::PayoutFailed => {
            (field(value, &["participant"]), key, amount())
        }
        EventKind::Airdropped => (field(value, &["sender"]), key, amount()),
        EventKind::TokenReceived => (field(value, &["from"]), key, amount()),
        EventKind::TokensConfirmed => (None, key, field(value, &["balance"])),
        EventKind::PresalePaid => (key, None, amount()),
        EventKind::FeesTransferred => (None, None, amount()),
        EventKind::PoolInitialized => (field(value, &["creator"]), field(value, &["currency"]), None),
        EventKind::RefundExpected | EventKind::WhitelistRemoved => {
            (value.as_str().map(String::from).or(key), None, None)
        }
        EventKind::StatusChanged
        | EventKind::SettingsChanged
        | EventKind::TokenDropsChanged
        | EventKind::Unknown => (None, None, None),
    }
}

fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A topic may arrive as `{"type":"symbol","value":"deposit"}` or as the
/// bare value.
fn topic_value(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        match v.get("value") {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    raw.to_string()
}

fn parse_timestamp(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}
