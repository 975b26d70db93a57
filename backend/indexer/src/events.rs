//! Event types emitted by the presale pool contract.
//!
//! The first topic of every pool event is a short symbol naming the change;
//! these map one-to-one onto [`EventKind`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `init`
    PoolInitialized,
    /// `deposit`, keyed by participant.
    Deposited,
    /// `withdraw`, keyed by participant.
    Withdrawn,
    /// `status`
    StatusChanged,
    /// `settings`
    SettingsChanged,
    /// `whitelist`, keyed by participant.
    WhitelistChanged,
    /// `whitelist_removed`
    WhitelistRemoved,
    /// `drops`
    TokenDropsChanged,
    /// `paid`, keyed by presale target.
    PresalePaid,
    /// `refund`, keyed by the expected refund sender.
    RefundExpected,
    /// `confirmed`, keyed by token.
    TokensConfirmed,
    /// `payout`, keyed by asset.
    PayoutSent,
    /// `failure`, keyed by asset.
    PayoutFailed,
    /// `reimburse`, keyed by recipient.
    Reimbursed,
    /// `fees`, keyed by fee manager.
    FeesTransferred,
    /// `airdrop`, keyed by asset.
    Airdropped,
    /// `tok_recv`, keyed by token.
    TokenReceived,
    Unknown,
}

impl EventKind {
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::PoolInitialized,
            "deposit" => Self::Deposited,
            "withdraw" => Self::Withdrawn,
            "status" => Self::StatusChanged,
            "settings" => Self::SettingsChanged,
            "whitelist" => Self::WhitelistChanged,
            "whitelist_removed" => Self::WhitelistRemoved,
            "drops" => Self::TokenDropsChanged,
            "paid" => Self::PresalePaid,
            "refund" => Self::RefundExpected,
            "confirmed" => Self::TokensConfirmed,
            "payout" => Self::PayoutSent,
            "failure" => Self::PayoutFailed,
            "reimburse" => Self::Reimbursed,
            "fees" => Self::FeesTransferred,
            "airdrop" => Self::Airdropped,
            "tok_recv" => Self::TokenReceived,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoolInitialized => "pool_initialized",
            Self::Deposited => "deposited",
            Self::Withdrawn => "withdrawn",
            Self::StatusChanged => "status_changed",
            Self::SettingsChanged => "settings_changed",
            Self::WhitelistChanged => "whitelist_changed",
            Self::WhitelistRemoved => "whitelist_removed",
            Self::TokenDropsChanged => "token_drops_changed",
            Self::PresalePaid => "presale_paid",
            Self::RefundExpected => "refund_expected",
            Self::TokensConfirmed => "tokens_confirmed",
            Self::PayoutSent => "payout_sent",
            Self::PayoutFailed => "payout_failed",
            Self::Reimbursed => "reimbursed",
            Self::FeesTransferred => "fees_transferred",
            Self::Airdropped => "airdropped",
            Self::TokenReceived => "token_received",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Self {
        match s {
            "pool_initialized" => Self::PoolInitialized,
            "deposited" => Self::Deposited,
            "withdrawn" => Self::Withdrawn,
            "status_changed" => Self::StatusChanged,
            "settings_changed" => Self::SettingsChanged,
            "whitelist_changed" => Self::WhitelistChanged,
            "whitelist_removed" => Self::WhitelistRemoved,
            "token_drops_changed" => Self::TokenDropsChanged,
            "presale_paid" => Self::PresalePaid,
            "refund_expected" => Self::RefundExpected,
            "tokens_confirmed" => Self::TokensConfirmed,
            "payout_sent" => Self::PayoutSent,
            "payout_failed" => Self::PayoutFailed,
            "reimbursed" => Self::Reimbursed,
            "fees_transferred" => Self::FeesTransferred,
            "airdropped" => Self::Airdropped,
            "token_received" => Self::TokenReceived,
            _ => Self::Unknown,
        }
    }
}

/// A decoded pool event, ready to be stored.
///
/// `participant` is the account the event concerns (depositor, payout
/// recipient, airdrop sender); `asset` is the token involved, if any.
/// Amounts are i128 on chain and kept as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEvent {
    pub event_id: Option<String>,
    pub event_type: String,
    pub participant: Option<String>,
    pub asset: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: Option<String>,
    pub event_type: String,
    pub participant: Option<String>,
    pub asset: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
