//! # Pool Fee Manager
//!
//! Collects the fee share of presale pools and pays it out to the team and
//! to each pool's fee recipients.
//!
//! | Phase        | Entry Point(s)                                          |
//! |--------------|---------------------------------------------------------|
//! | Bootstrap    | [`PoolFeeManager::init`]                                |
//! | Registration | [`PoolFeeManager::create`] (called by a pool)           |
//! | Collection   | [`PoolFeeManager::collect_fees`] (called by a pool)     |
//! | Recipients   | `claim_my_fees`, `distribute_fees`                      |
//! | Team         | `claim_my_team_fees`, `distribute_team_fees`            |
//! | Discounts    | [`PoolFeeManager::discount_fees`] (per-unit model only) |
//! | Queries      | `fee_rate`, `get_fees`, `schedule`, `team`, `team_total`|
//!
//! Every rate is scaled by [`ONE_UNIT`]; a fee is always
//! `amount * rate / ONE_UNIT`, rounded down.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, IntoVal, Vec};

mod events;
mod storage;
mod types;


pub use events::{FeesClaimed, FeesCollected, FeesDiscounted, ScheduleCreated};
pub use types::{FeeModel, FeeSchedule, PerUnitTerms};

/// Fixed-point scale of every rate.
pub const ONE_UNIT: i128 = 1_000_000_000_000_000_000;
/// Rates must stay strictly below 50%.
pub const MAX_FEE_RATE: i128 = ONE_UNIT / 2;
/// Ceiling on the team share under the percentage model (1%).
pub const TEAM_FEE_CAP: i128 = ONE_UNIT / 100;
pub const MAX_RECIPIENTS: u32 = 4;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeeError {
    AlreadyInitialized   = 1,
    NotInitialized       = 2,
    EmptyTeam            = 3,
    FeeTooHigh           = 4,
    InvalidRecipients    = 5,
    AlreadyCreated       = 6,
    ScheduleNotFound     = 7,
    NotRecipient         = 8,
    NotTeamMember        = 9,
    DiscountNotSupported = 10,
    InvalidDiscount      = 11,
    InvalidAmount        = 12,
    MathOverflow         = 13,
}

#[contract]
pub struct PoolFeeManager;

#[contractimpl]
impl PoolFeeManager {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Set the team, the fee currency and the fee model.
    ///
    /// Every team member signs the deployment. Duplicate members are folded.
    pub fn init(env: Env, team: Vec<Address>, currency: Address, model: FeeModel) -> Result<(), FeeError> {
        if storage::is_initialized(&env) {
            return Err(FeeError::AlreadyInitialized);
        }

        let team = unique(&env, &team);
        if team.is_empty() {
            return Err(FeeError::EmptyTeam);
        }
        for member in team.iter() {
            member.require_auth();
        }

        if let FeeModel::PerUnit(terms) = &model {
            if terms.team_fees_per_unit < 0 || terms.max_fees_per_unit < terms.team_fees_per_unit {
                return Err(FeeError::InvalidAmount);
            }
            if terms.max_fees_per_unit >= MAX_FEE_RATE {
                return Err(FeeError::FeeTooHigh);
            }
        }

        storage::save_setup(&env, &team, &currency, &model);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Pool-facing entry points
    // ─────────────────────────────────────────────────────────

    /// Register the calling pool with its fee rate and recipients.
    ///
    /// Callable once per pool; the pool itself must authorise the call.
    pub fn create(
        env: Env,
        pool: Address,
        fees_per_unit: i128,
        recipients: Vec<Address>,
    ) -> Result<(), FeeError> {
        pool.require_auth();

        if storage::has_schedule(&env, &pool) {
            return Err(FeeError::AlreadyCreated);
        }
        if fees_per_unit < 0 {
            return Err(FeeError::InvalidAmount);
        }
        if fees_per_unit >= MAX_FEE_RATE {
            return Err(FeeError::FeeTooHigh);
        }

        let count = recipients.len();
        if count == 0 || count > MAX_RECIPIENTS || unique(&env, &recipients).len() != count {
            return Err(FeeError::InvalidRecipients);
        }

        let (team_rate, recipients_rate) = match storage::model(&env)? {
            FeeModel::Percentage => {
                let team_rate = (fees_per_unit / (count as i128 + 1)).min(TEAM_FEE_CAP);
                (team_rate, fees_per_unit - team_rate)
            }
            FeeModel::PerUnit(terms) => {
                let total = terms.team_fees_per_unit + fees_per_unit;
                if total > terms.max_fees_per_unit || total >= MAX_FEE_RATE {
                    return Err(FeeError::FeeTooHigh);
                }
                (terms.team_fees_per_unit, fees_per_unit)
            }
        };

        let schedule = FeeSchedule {
            team_rate,
            recipients_rate,
            recipients,
            recipient_pot: 0,
        };
        storage::save_schedule(&env, &pool, &schedule);

        events::publish_created(
            &env,
            ScheduleCreated {
                pool,
                team_rate,
                recipients_rate,
            },
        );
        Ok(())
    }

    /// Pull `amount` of fee currency from `pool` and split it between the
    /// team and the pool's recipients.
    ///
    /// The pool must pre-authorise the currency transfer.
    pub fn collect_fees(env: Env, pool: Address, amount: i128) -> Result<(), FeeError> {
        pool.require_auth();
        if amount <= 0 {
            return Err(FeeError::InvalidAmount);
        }

        let mut schedule = storage::load_schedule(&env, &pool)?;
        let currency = storage::currency(&env)?;
        token::Client::new(&env, &currency).transfer(&pool, &env.current_contract_address(), &amount);

        let total_rate = schedule.total_rate();
        let team_amount = if total_rate == 0 {
            0
        } else {
            mul_div_floor(amount, schedule.team_rate, total_rate)?
        };
        storage::add_team_total(&env, team_amount);
        schedule.recipient_pot += amount - team_amount;
        storage::save_schedule(&env, &pool, &schedule);

        events::publish_collected(
            &env,
            FeesCollected {
                pool,
                amount,
                team_amount,
            },
        );
        Ok(())
    }

    /// Lower the rates of a per-unit pool.
    ///
    /// The pool relays a creator request; a team member must sign the exact
    /// `(pool, team_rate, recipients_rate)` tuple. Rates only move toward zero.
    pub fn discount_fees(
        env: Env,
        pool: Address,
        team_member: Address,
        team_rate: i128,
        recipients_rate: i128,
    ) -> Result<(), FeeError> {
        pool.require_auth();
        team_member.require_auth_for_args((pool.clone(), team_rate, recipients_rate).into_val(&env));

        if !storage::team(&env)?.contains(&team_member) {
            return Err(FeeError::NotTeamMember);
        }
        if storage::model(&env)? == FeeModel::Percentage {
            return Err(FeeError::DiscountNotSupported);
        }

        let mut schedule = storage::load_schedule(&env, &pool)?;
        if team_rate < 0
            || recipients_rate < 0
            || team_rate > schedule.team_rate
            || recipients_rate > schedule.recipients_rate
        {
            return Err(FeeError::InvalidDiscount);
        }

        schedule.team_rate = team_rate;
        schedule.recipients_rate = recipients_rate;
        storage::save_schedule(&env, &pool, &schedule);

        events::publish_discounted(
            &env,
            FeesDiscounted {
                pool,
                signer: team_member,
                team_rate,
                recipients_rate,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Recipient payouts
    // ─────────────────────────────────────────────────────────

    /// Pay `recipient` everything it is owed from `pool`'s pot.
    ///
    /// Returns the amount paid; zero once the pot has been fully claimed.
    pub fn claim_my_fees(env: Env, pool: Address, recipient: Address) -> Result<i128, FeeError> {
        recipient.require_auth();

        let schedule = storage::load_schedule(&env, &pool)?;
        if !schedule.recipients.contains(&recipient) {
            return Err(FeeError::NotRecipient);
        }

        let owed = recipient_owed(&env, &pool, &schedule, &recipient);
        if owed > 0 {
            let claimed = storage::recipient_claimed(&env, &pool, &recipient);
            storage::set_recipient_claimed(&env, &pool, &recipient, claimed + owed);
            let currency = storage::currency(&env)?;
            token::Client::new(&env, &currency).transfer(&env.current_contract_address(), &recipient, &owed);
            events::publish_claimed(&env, FeesClaimed { recipient, amount: owed });
        }
        Ok(owed)
    }

    /// Push every recipient of `pool` its outstanding share.
    ///
    /// A recipient that rejects the transfer is skipped and keeps its claim.
    pub fn distribute_fees(env: Env, pool: Address) -> Result<i128, FeeError> {
        let schedule = storage::load_schedule(&env, &pool)?;
        let currency = token::Client::new(&env, &storage::currency(&env)?);
        let this = env.current_contract_address();

        let mut paid = 0i128;
        for recipient in schedule.recipients.iter() {
            let owed = recipient_owed(&env, &pool, &schedule, &recipient);
            if owed <= 0 {
                continue;
            }
            let claimed = storage::recipient_claimed(&env, &pool, &recipient);
            storage::set_recipient_claimed(&env, &pool, &recipient, claimed + owed);
            if matches!(currency.try_transfer(&this, &recipient, &owed), Ok(Ok(()))) {
                paid += owed;
                events::publish_claimed(&env, FeesClaimed { recipient, amount: owed });
            } else {
                storage::set_recipient_claimed(&env, &pool, &recipient, claimed);
            }
        }
        Ok(paid)
    }

    // ─────────────────────────────────────────────────────────
    // Team payouts
    // ─────────────────────────────────────────────────────────

    /// Pay `member` its equal share of the team total.
    pub fn claim_my_team_fees(env: Env, member: Address) -> Result<i128, FeeError> {
        member.require_auth();

        let team = storage::team(&env)?;
        if !team.contains(&member) {
            return Err(FeeError::NotTeamMember);
        }

        let owed = team_owed(&env, &team, &member);
        if owed > 0 {
            storage::set_team_claimed(&env, &member, storage::team_claimed(&env, &member) + owed);
            let currency = storage::currency(&env)?;
            token::Client::new(&env, &currency).transfer(&env.current_contract_address(), &member, &owed);
            events::publish_claimed(&env, FeesClaimed { recipient: member, amount: owed });
        }
        Ok(owed)
    }

    /// Push every team member its outstanding share. Team-only.
    pub fn distribute_team_fees(env: Env, member: Address) -> Result<i128, FeeError> {
        member.require_auth();

        let team = storage::team(&env)?;
        if !team.contains(&member) {
            return Err(FeeError::NotTeamMember);
        }

        let currency = token::Client::new(&env, &storage::currency(&env)?);
        let this = env.current_contract_address();

        let mut paid = 0i128;
        for mate in team.iter() {
            let owed = team_owed(&env, &team, &mate);
            if owed <= 0 {
                continue;
            }
            let claimed = storage::team_claimed(&env, &mate);
            storage::set_team_claimed(&env, &mate, claimed + owed);
            if matches!(currency.try_transfer(&this, &mate, &owed), Ok(Ok(()))) {
                paid += owed;
                events::publish_claimed(&env, FeesClaimed { recipient: mate, amount: owed });
            } else {
                storage::set_team_claimed(&env, &mate, claimed);
            }
        }
        Ok(paid)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Combined team + recipient rate charged to `pool`.
    pub fn fee_rate(env: Env, pool: Address) -> Result<i128, FeeError> {
        Ok(storage::load_schedule(&env, &pool)?.total_rate())
    }

    /// `(per-recipient rate, total rate)` for `pool`.
    pub fn get_fees(env: Env, pool: Address) -> Result<(i128, i128), FeeError> {
        let schedule = storage::load_schedule(&env, &pool)?;
        let per_recipient = schedule.recipients_rate / schedule.recipients.len() as i128;
        Ok((per_recipient, schedule.total_rate()))
    }

    pub fn schedule(env: Env, pool: Address) -> Result<FeeSchedule, FeeError> {
        storage::load_schedule(&env, &pool)
    }

    pub fn team(env: Env) -> Result<Vec<Address>, FeeError> {
        storage::team(&env)
    }

    pub fn team_total(env: Env) -> i128 {
        storage::team_total(&env)
    }

    pub fn model(env: Env) -> Result<FeeModel, FeeError> {
        storage::model(&env)
    }
}

fn recipient_owed(env: &Env, pool: &Address, schedule: &FeeSchedule, recipient: &Address) -> i128 {
    let share = schedule.recipient_pot / schedule.recipients.len() as i128;
    share - storage::recipient_claimed(env, pool, recipient)
}

fn team_owed(env: &Env, team: &Vec<Address>, member: &Address) -> i128 {
    let share = storage::team_total(env) / team.len() as i128;
    share - storage::team_claimed(env, member)
}

fn unique(env: &Env, addresses: &Vec<Address>) -> Vec<Address> {
    let mut seen = Vec::new(env);
    for address in addresses.iter() {
        if !seen.contains(&address) {
            seen.push_back(address);
        }
    }
    seen
}

fn mul_div_floor(a: i128, b: i128, c: i128) -> Result<i128, FeeError> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(c))
        .ok_or(FeeError::MathOverflow)
}
