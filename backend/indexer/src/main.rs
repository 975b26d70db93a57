//! Presale pool event indexer.
//!
//! Polls Soroban `getEvents` for one pool contract, persists the decoded
//! events to SQLite and serves them over a small Axum REST API. Ctrl-C stops
//! both the poller and the server.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;

use std::sync::Arc;

use axum::{routing::get, Router};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use indexer::IndexerState;
use rpc::EventSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let cancel = CancellationToken::new();

    // ─── Background indexer ───────────────────────────────
    let indexer_state = Arc::new(IndexerState {
        pool: pool.clone(),
        config: config.clone(),
        source: EventSource::new(client, config.rpc_url.clone(), config.contract_id.clone())
            .with_max_backoff(config.max_backoff_secs),
    });
    let poller = tokio::spawn(indexer::run(indexer_state, cancel.clone()));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState { pool });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/events", get(api::get_all_events))
        .route(
            "/participants/:address/events",
            get(api::get_participant_events),
        )
        .route(
            "/participants/:address/summary",
            get(api::get_participant_summary),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for ctrl-c: {e}");
            }
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    poller.await?;
    info!("shutdown complete");
    Ok(())
}
