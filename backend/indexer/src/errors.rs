//! Indexer failures and how they surface over HTTP.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("sqlite: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("rpc transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed rpc payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{key}: {reason}")]
    Config { key: &'static str, reason: String },

    /// The node refused the request itself; retrying cannot help.
    #[error("getEvents rejected with code {code}: {message}")]
    RpcRejected { code: i64, message: String },

    #[error("getEvents reply carried neither a result nor an error")]
    EmptyReply,

    #[error("`{0}` is not a Stellar account or contract address")]
    InvalidAddress(String),
}

impl IndexerError {
    pub fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            key,
            reason: reason.into(),
        }
    }

    /// Caller mistakes are 400s, everything else is ours.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
