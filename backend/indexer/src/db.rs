//! SQLite persistence: migrations, the poll cursor and event storage.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, PoolEvent};

const EVENT_COLUMNS: &str = "id, event_id, event_type, participant, asset, amount, ledger, \
                             timestamp, contract_id, tx_hash, created_at";

/// Open the pool (creating the database file if needed) and apply migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let url = if url.contains('?') || url.contains(":memory:") {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database migrations applied");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────

/// Last ledger and pagination cursor persisted by the poller.
pub async fn load_cursor(pool: &SqlitePool) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.unwrap_or((0, None)))
}

pub async fn save_cursor(pool: &SqlitePool, last_ledger: i64, last_cursor: Option<&str>) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────

/// Store a batch of events in one transaction. Events whose RPC id is
/// already stored are skipped. Returns the number of new rows.
pub async fn insert_events(pool: &SqlitePool, events: &[PoolEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;
    for ev in events {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, participant, asset, amount, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.participant)
        .bind(&ev.asset)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected() as usize;
    }
    tx.commit().await?;
    Ok(inserted)
}

pub async fn events_for_participant(pool: &SqlitePool, participant: &str) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE participant = ?1 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(participant)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Events in ledger order, optionally narrowed to one event type.
pub async fn all_events(pool: &SqlitePool, event_type: Option<&str>) -> Result<Vec<EventRecord>> {
    let rows = match event_type {
        Some(event_type) => {
            let sql = format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE event_type = ?1 ORDER BY ledger ASC, id ASC"
            );
            sqlx::query_as::<_, EventRecord>(&sql)
                .bind(event_type)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC");
            sqlx::query_as::<_, EventRecord>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}
