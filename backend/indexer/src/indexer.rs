//! Background task that polls the Soroban RPC and writes decoded pool
//! events to the database.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc::{self, EventSource};

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub source: EventSource,
}

/// Poll until `cancel` fires. The cursor is persisted after every page, so a
/// restart resumes where the last run stopped.
pub async fn run(state: Arc<IndexerState>, cancel: CancellationToken) {
    info!(contract = state.source.contract_id(), "indexer starting");

    let (last_ledger, mut cursor) = match db::load_cursor(&state.pool).await {
        Ok(saved) => saved,
        Err(e) => {
            error!("could not load cursor, starting fresh: {e}");
            (0, None)
        }
    };
    let mut current_ledger = if last_ledger > 0 {
        last_ledger as u32
    } else {
        state.config.start_ledger
    };
    info!("resuming from ledger {current_ledger}");

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("indexer stopping");
                return;
            }
            polled = poll_once(&state, current_ledger, cursor.as_deref()) => match polled {
                Ok((next_ledger, next_cursor)) => {
                    current_ledger = next_ledger;
                    cursor = next_cursor;
                }
                Err(e) => error!("indexer poll error: {e}"),
            },
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("indexer stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// One page of events. Returns `(next_start_ledger, next_cursor)`.
async fn poll_once(
    state: &IndexerState,
    start_ledger: u32,
    cursor: Option<&str>,
) -> Result<(u32, Option<String>)> {
    let page = state
        .source
        .fetch_page(start_ledger, cursor, state.config.events_per_page)
        .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, state.source.contract_id());
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            fetched = page.events.len(),
            inserted, "stored pool events"
        );
    }

    // With a cursor the next call continues inside the same range; the
    // ledger only matters once pagination restarts.
    let next_ledger = page
        .latest_ledger
        .map(|l| (l as u32).max(start_ledger))
        .unwrap_or(start_ledger);

    db::save_cursor(&state.pool, next_ledger as i64, page.cursor.as_deref()).await?;
    Ok((next_ledger, page.cursor))
}
