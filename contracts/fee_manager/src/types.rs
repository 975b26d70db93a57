//! # Types
//!
//! Fee schedules are registered per pool contract. The two supported models
//! differ only in how the team share of a pool's rate is derived and whether
//! it can be discounted afterwards:
//!
//! ```text
//! Percentage:  team = min(rate / (recipients + 1), TEAM_FEE_CAP)
//!              recipients = rate - team
//!
//! PerUnit:     team = team_fees_per_unit        (fixed at init)
//!              recipients = creator rate        (team + recipients <= max)
//!              both may only move toward zero via `discount_fees`
//! ```

use soroban_sdk::{contracttype, Address, Vec};

/// Terms of the per-unit model, fixed when the fee manager is initialised.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PerUnitTerms {
    /// Team rate charged per unit of forwarded currency.
    pub team_fees_per_unit: i128,
    /// Ceiling on team + recipient rate for any pool.
    pub max_fees_per_unit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeeModel {
    /// Flat percentage of the pool; the team share is derived from the rate.
    Percentage,
    /// Per-unit team + creator rates with a creator-requested discount band.
    PerUnit(PerUnitTerms),
}

/// Fee schedule registered by a single pool contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeSchedule {
    /// Share of the rate owed to the team.
    pub team_rate: i128,
    /// Share of the rate split equally across `recipients`.
    pub recipients_rate: i128,
    pub recipients: Vec<Address>,
    /// Total currency collected for recipients of this pool.
    pub recipient_pot: i128,
}

impl FeeSchedule {
    pub fn total_rate(&self) -> i128 {
        self.team_rate + self.recipients_rate
    }
}
