//! # Lifecycle
//!
//! Gating rules for [`PoolStatus`]. Only `Open ⇄ Closed` moves backward;
//! everything else advances once.

use soroban_sdk::Env;

use crate::events;
use crate::types::{PoolState, PoolStatus};
use crate::Error;

/// States in which the ledger, the whitelist and the limits may change.
pub const ACCEPTING_CHANGES: [PoolStatus; 2] = [PoolStatus::Open, PoolStatus::Closed];

/// States in which currency is paid out pro-rata instead of from the ledger.
pub const SETTLING: [PoolStatus; 4] = [
    PoolStatus::Failed,
    PoolStatus::Paid,
    PoolStatus::TokensReady,
    PoolStatus::Refund,
];

pub fn can_transition(from: PoolStatus, to: PoolStatus) -> bool {
    matches!(
        (from, to),
        (PoolStatus::Open, PoolStatus::Closed)
            | (PoolStatus::Closed, PoolStatus::Open)
            | (PoolStatus::Open, PoolStatus::Failed)
            | (PoolStatus::Closed, PoolStatus::Failed)
            | (PoolStatus::Open, PoolStatus::Paid)
            | (PoolStatus::Closed, PoolStatus::Paid)
            | (PoolStatus::Paid, PoolStatus::TokensReady)
            | (PoolStatus::Paid, PoolStatus::Refund)
    )
}

pub fn require_status(state: &PoolState, allowed: &[PoolStatus]) -> Result<(), Error> {
    if allowed.contains(&state.status) {
        Ok(())
    } else {
        Err(Error::InvalidState)
    }
}

pub fn accepts_changes(state: &PoolState) -> bool {
    ACCEPTING_CHANGES.contains(&state.status)
}

pub fn transition(env: &Env, state: &mut PoolState, to: PoolStatus) -> Result<(), Error> {
    let from = state.status;
    if !can_transition(from, to) {
        return Err(Error::InvalidState);
    }
    state.status = to;
    events::status_changed(env, from, to);
    Ok(())
}
