//! # Storage
//!
//! Typed helpers over the two storage tiers used by the pool.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                | Type         | Description                          |
//! |--------------------|--------------|--------------------------------------|
//! | `Config`           | `PoolConfig` | Immutable configuration              |
//! | `State`            | `PoolState`  | Status, totals, limits, fees owed    |
//! | `ParticipantCount` | `u32`        | Length of the participant index      |
//! | `FailureCount`     | `u32`        | Length of the failures log           |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type          | Description                        |
//! |--------------------------|---------------|------------------------------------|
//! | `Participant(addr)`      | `Participant` | Ledger entry                       |
//! | `ParticipantAt(i)`       | `Address`     | Insertion-ordered participant index|
//! | `Claimed(asset, addr)`   | `i128`        | Paid to `addr` in `asset`          |
//! | `Distributed(asset)`     | `i128`        | Paid to everyone in `asset`        |
//! | `FailureAt(i)`           | `Failure`     | Rejected payout log                |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Ledger entries are never removed; a fully withdrawn participant keeps a
//! zeroed record and its index slot.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Failure, Participant, PoolConfig, PoolState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    State,
    ParticipantCount,
    FailureCount,
    Participant(Address),
    ParticipantAt(u32),
    Claimed(Address, Address),
    Distributed(Address),
    FailureAt(u32),
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

// ── Config / State ───────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<PoolConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn load_state(env: &Env) -> Result<PoolState, Error> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

// ── Participants ─────────────────────────────────────────────────────

/// Load a participant, or a fresh zeroed entry for an unknown address.
///
/// Unknown addresses are whitelisted unless the pool is restricted.
pub fn load_participant(env: &Env, address: &Address, restricted: bool) -> Participant {
    let key = DataKey::Participant(address.clone());
    match env.storage().persistent().get::<_, Participant>(&key) {
        Some(participant) => {
            bump_persistent(env, &key);
            participant
        }
        None => Participant {
            whitelisted: !restricted,
            ..Participant::default()
        },
    }
}

pub fn find_participant(env: &Env, address: &Address) -> Option<Participant> {
    env.storage()
        .persistent()
        .get(&DataKey::Participant(address.clone()))
}

/// Persist a participant, appending it to the index on first write.
pub fn save_participant(env: &Env, address: &Address, participant: &Participant) {
    let key = DataKey::Participant(address.clone());
    if !env.storage().persistent().has(&key) {
        let index = participant_count(env);
        let slot = DataKey::ParticipantAt(index);
        env.storage().persistent().set(&slot, address);
        bump_persistent(env, &slot);
        env.storage()
            .instance()
            .set(&DataKey::ParticipantCount, &(index + 1));
    }
    env.storage().persistent().set(&key, participant);
    bump_persistent(env, &key);
}

pub fn participant_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ParticipantCount)
        .unwrap_or(0)
}

pub fn participant_at(env: &Env, index: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::ParticipantAt(index))
}

// ── Claims ───────────────────────────────────────────────────────────

pub fn claimed(env: &Env, asset: &Address, participant: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Claimed(asset.clone(), participant.clone()))
        .unwrap_or(0)
}

pub fn set_claimed(env: &Env, asset: &Address, participant: &Address, amount: i128) {
    let key = DataKey::Claimed(asset.clone(), participant.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn distributed(env: &Env, asset: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Distributed(asset.clone()))
        .unwrap_or(0)
}

pub fn set_distributed(env: &Env, asset: &Address, amount: i128) {
    let key = DataKey::Distributed(asset.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

// ── Failures log ─────────────────────────────────────────────────────

pub fn failure_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::FailureCount)
        .unwrap_or(0)
}

pub fn push_failure(env: &Env, failure: &Failure) {
    let index = failure_count(env);
    let key = DataKey::FailureAt(index);
    env.storage().persistent().set(&key, failure);
    bump_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::FailureCount, &(index + 1));
}

pub fn failure_at(env: &Env, index: u32) -> Option<Failure> {
    env.storage().persistent().get(&DataKey::FailureAt(index))
}
