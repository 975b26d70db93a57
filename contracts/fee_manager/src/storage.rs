//! # Storage
//!
//! ## Instance storage
//!
//! | Key         | Type           | Description                          |
//! |-------------|----------------|--------------------------------------|
//! | `Team`      | `Vec<Address>` | De-duplicated team members           |
//! | `Currency`  | `Address`      | Currency every fee is paid in        |
//! | `Model`     | `FeeModel`     | Fee model chosen at init             |
//! | `TeamTotal` | `i128`         | Team share collected across pools    |
//!
//! ## Persistent storage
//!
//! | Key                          | Type          | Description                     |
//! |------------------------------|---------------|---------------------------------|
//! | `Schedule(pool)`             | `FeeSchedule` | Rates, recipients and pot       |
//! | `RecipientClaimed(pool, r)`  | `i128`        | Paid to `r` out of `pool`'s pot |
//! | `TeamClaimed(member)`        | `i128`        | Paid to a team member           |

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{FeeModel, FeeSchedule};
use crate::FeeError;

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Team,
    Currency,
    Model,
    TeamTotal,
    Schedule(Address),
    RecipientClaimed(Address, Address),
    TeamClaimed(Address),
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Instance ─────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Team)
}

pub fn save_setup(env: &Env, team: &Vec<Address>, currency: &Address, model: &FeeModel) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Team, team);
    instance.set(&DataKey::Currency, currency);
    instance.set(&DataKey::Model, model);
    instance.set(&DataKey::TeamTotal, &0i128);
    bump_instance(env);
}

pub fn team(env: &Env) -> Result<Vec<Address>, FeeError> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Team)
        .ok_or(FeeError::NotInitialized)
}

pub fn currency(env: &Env) -> Result<Address, FeeError> {
    env.storage()
        .instance()
        .get(&DataKey::Currency)
        .ok_or(FeeError::NotInitialized)
}

pub fn model(env: &Env) -> Result<FeeModel, FeeError> {
    env.storage()
        .instance()
        .get(&DataKey::Model)
        .ok_or(FeeError::NotInitialized)
}

pub fn team_total(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TeamTotal)
        .unwrap_or(0)
}

pub fn add_team_total(env: &Env, amount: i128) {
    let total = team_total(env) + amount;
    env.storage().instance().set(&DataKey::TeamTotal, &total);
}

// ── Persistent ───────────────────────────────────────────────────────

pub fn has_schedule(env: &Env, pool: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Schedule(pool.clone()))
}

pub fn load_schedule(env: &Env, pool: &Address) -> Result<FeeSchedule, FeeError> {
    let key = DataKey::Schedule(pool.clone());
    let schedule = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(FeeError::ScheduleNotFound)?;
    bump_persistent(env, &key);
    Ok(schedule)
}

pub fn save_schedule(env: &Env, pool: &Address, schedule: &FeeSchedule) {
    let key = DataKey::Schedule(pool.clone());
    env.storage().persistent().set(&key, schedule);
    bump_persistent(env, &key);
}

pub fn recipient_claimed(env: &Env, pool: &Address, recipient: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::RecipientClaimed(pool.clone(), recipient.clone()))
        .unwrap_or(0)
}

pub fn set_recipient_claimed(env: &Env, pool: &Address, recipient: &Address, amount: i128) {
    let key = DataKey::RecipientClaimed(pool.clone(), recipient.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn team_claimed(env: &Env, member: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::TeamClaimed(member.clone()))
        .unwrap_or(0)
}

pub fn set_team_claimed(env: &Env, member: &Address, amount: i128) {
    let key = DataKey::TeamClaimed(member.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}
