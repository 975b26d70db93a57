//! Axum REST API handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;

use crate::config::is_strkey;
use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct EventsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Currency and token movements of one participant, rebuilt from indexed
/// events. Amounts are decimal strings of on-chain i128 values.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub participant: String,
    pub deposited: String,
    pub withdrawn: String,
    /// Delivered payouts per asset.
    pub payouts: BTreeMap<String, String>,
    pub failed_payouts: usize,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events?type=deposited`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EventsQuery>,
) -> Response {
    match db::all_events(&state.pool, query.event_type.as_deref()).await {
        Ok(events) => Json(EventsResponse {
            participant: None,
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => failure(e),
    }
}

/// `GET /participants/:address/events`
pub async fn get_participant_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    match participant_events(&state, &address).await {
        Ok(events) => Json(EventsResponse {
            participant: Some(address),
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => failure(e),
    }
}

/// `GET /participants/:address/summary`
pub async fn get_participant_summary(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    match participant_events(&state, &address).await {
        Ok(events) => Json(summarize(&address, &events)).into_response(),
        Err(e) => failure(e),
    }
}

/// Participants are accounts, or pools chained into this one.
async fn participant_events(state: &ApiState, address: &str) -> Result<Vec<EventRecord>> {
    if !is_strkey(address, &['G', 'C']) {
        return Err(IndexerError::InvalidAddress(address.to_string()));
    }
    db::events_for_participant(&state.pool, address).await
}

fn failure(e: IndexerError) -> Response {
    let status = e.status();
    if status.is_server_error() {
        error!("query failed: {e}");
    }
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

pub fn summarize(participant: &str, events: &[EventRecord]) -> ParticipantSummary {
    let mut deposited = 0i128;
    let mut withdrawn = 0i128;
    let mut payouts: BTreeMap<String, i128> = BTreeMap::new();
    let mut failed_payouts = 0usize;

    for event in events {
        let amount = event
            .amount
            .as_deref()
            .and_then(|a| a.parse::<i128>().ok())
            .unwrap_or(0);
        match EventKind::from_stored(&event.event_type) {
            EventKind::Deposited => deposited += amount,
            EventKind::Withdrawn => withdrawn += amount,
            EventKind::PayoutSent => {
                let asset = event.asset.clone().unwrap_or_default();
                *payouts.entry(asset).or_default() += amount;
            }
            EventKind::PayoutFailed => failed_payouts += 1,
            _ => {}
        }
    }

    ParticipantSummary {
        participant: participant.to_string(),
        deposited: deposited.to_string(),
        withdrawn: withdrawn.to_string(),
        payouts: payouts
            .into_iter()
            .map(|(asset, amount)| (asset, amount.to_string()))
            .collect(),
        failed_payouts,
    }
}
