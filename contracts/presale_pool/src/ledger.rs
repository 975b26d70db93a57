//! # Contribution ledger and policy
//!
//! Pure bookkeeping over a [`PoolState`] and one [`Participant`]. Nothing in
//! here touches storage or moves currency; callers persist the result and
//! perform the matching transfer.
//!
//! Every mutation ends with [`settle`], which re-validates the participant's
//! whole balance against the current limits:
//!
//! ```text
//! balance  = contribution + remaining
//! accepted = whitelisted ? balance : 0
//!          = min(accepted, max_contribution)                       if set
//!          = min(accepted, max_pool_balance - other contributions) if set
//!          = 0 when accepted < min_contribution
//! contribution = accepted, remaining = balance - accepted
//! ```

use crate::math::checked_sum;
use crate::types::{ContributionLimits, Participant, PoolState};
use crate::Error;

/// Reject limit combinations that could never be satisfied. Zero means
/// unlimited for the maximums.
pub fn validate_limits(limits: &ContributionLimits) -> Result<(), Error> {
    let min = limits.min_contribution;
    let max = limits.max_contribution;
    let pool_max = limits.max_pool_balance;

    if min < 0 || max < 0 || pool_max < 0 {
        return Err(Error::InvalidContributionSettings);
    }
    if max > 0 && min > max {
        return Err(Error::InvalidContributionSettings);
    }
    if pool_max > 0 && (max > pool_max || min > pool_max) {
        return Err(Error::InvalidContributionSettings);
    }
    Ok(())
}

/// Replace the participant's buckets, keeping pool aggregates in step.
fn rebook(state: &mut PoolState, participant: &mut Participant, contribution: i128, remaining: i128) {
    let was_contributor = participant.contribution > 0;

    state.pool_total += contribution - participant.contribution;
    state.remaining_total += remaining - participant.remaining;
    participant.contribution = contribution;
    participant.remaining = remaining;

    match (was_contributor, contribution > 0) {
        (false, true) => state.contributors += 1,
        (true, false) => state.contributors -= 1,
        _ => {}
    }
}

pub fn settle(state: &mut PoolState, participant: &mut Participant) {
    let balance = participant.contribution + participant.remaining;
    let limits = &state.limits;

    let mut accepted = if participant.whitelisted { balance } else { 0 };
    if limits.max_contribution > 0 {
        accepted = accepted.min(limits.max_contribution);
    }
    if limits.max_pool_balance > 0 {
        let others = state.pool_total - participant.contribution;
        accepted = accepted.min((limits.max_pool_balance - others).max(0));
    }
    if accepted < limits.min_contribution {
        accepted = 0;
    }

    rebook(state, participant, accepted, balance - accepted);
}

pub fn deposit(state: &mut PoolState, participant: &mut Participant, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if !participant.whitelisted {
        return Err(Error::NotWhitelisted);
    }

    let contribution = participant.contribution;
    let remaining = checked_sum(participant.remaining, amount)?;
    rebook(state, participant, contribution, remaining);
    participant.exists = true;
    settle(state, participant);

    if participant.contribution + participant.remaining < state.limits.min_contribution {
        return Err(Error::BelowMinContribution);
    }
    Ok(())
}

/// Withdraw while the pool still holds the currency.
///
/// `amount <= 0` releases the whole `remaining` bucket. A positive amount is
/// taken from `remaining` first, then from `contribution`. Returns the amount
/// released.
pub fn withdraw(state: &mut PoolState, participant: &mut Participant, amount: i128) -> Result<i128, Error> {
    let amount = if amount <= 0 { participant.remaining } else { amount };
    if amount > participant.contribution + participant.remaining {
        return Err(Error::InsufficientBalance);
    }

    let from_remaining = amount.min(participant.remaining);
    let contribution = participant.contribution - (amount - from_remaining);
    if contribution > 0 && contribution < state.limits.min_contribution {
        return Err(Error::BelowMinContribution);
    }

    let remaining = participant.remaining - from_remaining;
    rebook(state, participant, contribution, remaining);
    settle(state, participant);
    Ok(amount)
}

/// Release the participant's whole balance. Always legal while the pool
/// still holds the currency.
pub fn withdraw_all(state: &mut PoolState, participant: &mut Participant) -> i128 {
    let amount = participant.contribution + participant.remaining;
    rebook(state, participant, 0, 0);
    amount
}

pub fn set_whitelisted(state: &mut PoolState, participant: &mut Participant, whitelisted: bool) {
    participant.whitelisted = whitelisted;
    settle(state, participant);
}
