//! # Gas reimbursement
//!
//! When a pool is configured with token drops and a reimbursement recipient,
//! the operations that trigger distribution passes pay the recipient the
//! estimated execution cost of those passes:
//!
//! ```text
//! cost = contributors * drops * TRANSFER_COST_UNITS * min(unit_price, max_unit_price)
//! ```
//!
//! `fail` reimburses one drop and `pay_to_presale` every configured drop,
//! both out of pooled currency. `fail` never takes more than the pool total,
//! so `remaining` buckets stay whole. Airdrops reimburse one drop out of the
//! airdropper's funds.

use soroban_sdk::{token, Address, Env};

use crate::events::{self, Reimbursed};
use crate::types::{ContributionLimits, PoolConfig, PoolState};
use crate::Error;

pub const MAX_TOKEN_DROPS: u32 = 10;

/// Estimated execution units of one payout to one participant.
pub const TRANSFER_COST_UNITS: i128 = 40_000;

pub fn estimate(participants: u32, drops: u32, unit_price: i128) -> Result<i128, Error> {
    (participants as i128)
        .checked_mul(drops as i128)
        .and_then(|n| n.checked_mul(TRANSFER_COST_UNITS))
        .and_then(|n| n.checked_mul(unit_price))
        .ok_or(Error::MathOverflow)
}

/// A minimum contribution must cover at least twice its own reimbursement.
pub fn validate(limits: &ContributionLimits, drops: u32, max_unit_price: i128) -> Result<(), Error> {
    if drops > MAX_TOKEN_DROPS {
        return Err(Error::TooManyTokenDrops);
    }
    if drops > 0 {
        let floor = estimate(1, drops, max_unit_price)?
            .checked_mul(2)
            .ok_or(Error::MathOverflow)?;
        if limits.min_contribution < floor {
            return Err(Error::ReimbursementTooHigh);
        }
    }
    Ok(())
}

pub fn is_configured(state: &PoolState) -> bool {
    state.total_token_drops > 0 && state.auto_distribute_recipient.is_some()
}

/// Reimbursement owed for `drops` passes over the current contributors.
pub fn cost(config: &PoolConfig, state: &PoolState, drops: u32, unit_price: i128) -> Result<i128, Error> {
    if !is_configured(state) || drops == 0 || unit_price <= 0 {
        return Ok(0);
    }
    estimate(state.contributors, drops, unit_price.min(config.max_unit_price))
}

/// Send `amount` from `payer` to the configured recipient.
pub fn pay(env: &Env, config: &PoolConfig, state: &PoolState, payer: &Address, amount: i128, drops: u32) {
    let Some(recipient) = state.auto_distribute_recipient.clone() else {
        return;
    };
    if amount <= 0 {
        return;
    }

    token::Client::new(env, &config.currency).transfer(payer, &recipient, &amount);
    events::reimbursed(
        env,
        Reimbursed {
            recipient,
            amount,
            drops,
        },
    );
}
