//! # Types
//!
//! Shared data structures used across all modules of the presale pool.
//!
//! ## Config / State split
//!
//! A pool is stored as two instance entries:
//!
//! - [`PoolConfig`]: written once by `init`, never mutated.
//! - [`PoolState`]: written by every ledger mutation and state transition.
//!
//! The public API exposes the reconstructed [`Pool`] struct.
//!
//! ## Status as a Finite-State Machine
//!
//! ```text
//! Open ◄──► Closed
//!   │         │
//!   ├─────────┼──► Failed
//!   └─────────┴──► Paid ──► TokensReady
//!                    └────► Refund
//! ```
//!
//! `Failed`, `TokensReady` and `Refund` are terminal; `Paid` only moves
//! forward. See [`crate::lifecycle`] for the gating rules.

use soroban_sdk::{contracttype, Address, Vec};

/// Lifecycle status of the pool.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PoolStatus {
    /// Accepting deposits.
    Open,
    /// Deposits paused; withdrawals still allowed.
    Closed,
    /// Cancelled before forwarding; currency refundable pro-rata.
    Failed,
    /// Pooled currency forwarded to the presale.
    Paid,
    /// Token balance confirmed; token distribution enabled.
    TokensReady,
    /// The presale returned the forwarded currency.
    Refund,
}

/// Per-participant and pool-wide contribution limits. Zero means unlimited
/// for `max_contribution` and `max_pool_balance`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionLimits {
    pub min_contribution: i128,
    pub max_contribution: i128,
    pub max_pool_balance: i128,
}

/// Deployment parameters accepted by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParams {
    /// Stellar asset used as the pool's native currency.
    pub currency: Address,
    /// Fee manager contract this pool registers with.
    pub fee_manager: Address,
    /// Fee rate requested from the fee manager, scaled by `ONE_UNIT`.
    pub fees_per_unit: i128,
    /// Fee recipients; an empty list registers the creator alone.
    pub fee_recipients: Vec<Address>,
    pub limits: ContributionLimits,
    /// Addresses allowed to change contribution limits.
    pub admins: Vec<Address>,
    pub restricted: bool,
    pub whitelist: Vec<Address>,
    /// Number of future distribution passes reimbursed at payout.
    pub total_token_drops: u32,
    pub auto_distribute_recipient: Option<Address>,
    /// Cap on the caller-supplied unit price used by reimbursement.
    pub max_unit_price: i128,
}

/// Immutable pool configuration, written once at init.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub creator: Address,
    pub currency: Address,
    pub fee_manager: Address,
    pub fees_per_unit: i128,
    pub max_unit_price: i128,
    pub admins: Vec<Address>,
}

/// Mutable pool state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub status: PoolStatus,
    /// Sum of every active contribution. Frozen once the pool leaves Open/Closed.
    pub pool_total: i128,
    /// Sum of every participant's `remaining` bucket.
    pub remaining_total: i128,
    /// Participants with a non-zero contribution.
    pub contributors: u32,
    pub limits: ContributionLimits,
    pub restricted: bool,
    /// Fees deducted at payout and not yet sent to the fee manager.
    pub fees_owed: i128,
    pub token: Option<Address>,
    pub auto_distribute: bool,
    pub total_token_drops: u32,
    pub auto_distribute_recipient: Option<Address>,
    /// Presale address the creator expects a refund from.
    pub refund_sender: Option<Address>,
    /// Reimbursement taken from pooled currency by `pay_to_presale`.
    pub payout_reimbursement: i128,
}

/// Full representation of the pool returned by `get_pool`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub creator: Address,
    pub currency: Address,
    pub fee_manager: Address,
    pub fees_per_unit: i128,
    pub admins: Vec<Address>,
    pub status: PoolStatus,
    pub pool_total: i128,
    pub remaining_total: i128,
    pub contributors: u32,
    pub limits: ContributionLimits,
    pub restricted: bool,
    pub fees_owed: i128,
    pub token: Option<Address>,
    pub total_token_drops: u32,
}

/// Ledger entry of one participant.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Participant {
    /// Currency counted toward the pool total and proportional shares.
    pub contribution: i128,
    /// Currency deposited but not accepted, refundable on demand.
    pub remaining: i128,
    pub whitelisted: bool,
    /// Set on first deposit; distinguishes "never deposited" from "withdrew".
    pub exists: bool,
}

/// Participant entry paired with its address, for read views.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantBalance {
    pub address: Address,
    pub contribution: i128,
    pub remaining: i128,
    pub whitelisted: bool,
    pub exists: bool,
}

/// A payout that the recipient or the asset contract rejected.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    pub participant: Address,
    pub asset: Address,
    pub amount: i128,
}

/// Capability held by an address.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Creator,
    Admin,
}
