//! # Events
//!
//! Every state change publishes one event. The first topic is a short symbol
//! naming the change; the second, when present, is the address the change is
//! about (participant, asset, target). Payloads are the structs below.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::{ContributionLimits, Participant, PoolStatus};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInitialized {
    pub creator: Address,
    pub currency: Address,
    pub fee_manager: Address,
    pub limits: ContributionLimits,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    pub participant: Address,
    pub amount: i128,
    pub contribution: i128,
    pub remaining: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub participant: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub from: PoolStatus,
    pub to: PoolStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhitelistChanged {
    pub participant: Address,
    pub whitelisted: bool,
    pub contribution: i128,
    pub remaining: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresalePaid {
    pub target: Address,
    pub amount: i128,
    pub fees: i128,
    pub reimbursement: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensConfirmed {
    pub token: Address,
    pub balance: i128,
    pub auto_distribute: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoutSent {
    pub participant: Address,
    pub asset: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoutFailed {
    pub participant: Address,
    pub asset: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reimbursed {
    pub recipient: Address,
    pub amount: i128,
    pub drops: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesTransferred {
    pub fee_manager: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Airdropped {
    pub sender: Address,
    pub asset: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenReceived {
    pub token: Address,
    pub from: Address,
    pub amount: i128,
}

pub fn initialized(env: &Env, event: PoolInitialized) {
    env.events().publish((symbol_short!("init"),), event);
}

pub fn deposited(env: &Env, participant: &Address, amount: i128, record: &Participant) {
    env.events().publish(
        (symbol_short!("deposit"), participant.clone()),
        Deposited {
            participant: participant.clone(),
            amount,
            contribution: record.contribution,
            remaining: record.remaining,
        },
    );
}

pub fn withdrawn(env: &Env, participant: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("withdraw"), participant.clone()),
        Withdrawn {
            participant: participant.clone(),
            amount,
        },
    );
}

pub fn status_changed(env: &Env, from: PoolStatus, to: PoolStatus) {
    env.events()
        .publish((symbol_short!("status"),), StatusChanged { from, to });
}

pub fn settings_changed(env: &Env, limits: &ContributionLimits) {
    env.events()
        .publish((symbol_short!("settings"),), limits.clone());
}

pub fn whitelist_changed(env: &Env, participant: &Address, record: &Participant) {
    env.events().publish(
        (symbol_short!("whitelist"), participant.clone()),
        WhitelistChanged {
            participant: participant.clone(),
            whitelisted: record.whitelisted,
            contribution: record.contribution,
            remaining: record.remaining,
        },
    );
}

pub fn whitelist_removed(env: &Env, creator: &Address) {
    env.events()
        .publish((Symbol::new(env, "whitelist_removed"),), creator.clone());
}

pub fn token_drops_changed(env: &Env, drops: u32) {
    env.events().publish((symbol_short!("drops"),), drops);
}

pub fn presale_paid(env: &Env, event: PresalePaid) {
    env.events()
        .publish((symbol_short!("paid"), event.target.clone()), event);
}

pub fn refund_expected(env: &Env, sender: &Address) {
    env.events()
        .publish((symbol_short!("refund"), sender.clone()), sender.clone());
}

pub fn tokens_confirmed(env: &Env, event: TokensConfirmed) {
    env.events()
        .publish((symbol_short!("confirmed"), event.token.clone()), event);
}

pub fn payout_sent(env: &Env, asset: &Address, participant: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("payout"), asset.clone()),
        PayoutSent {
            participant: participant.clone(),
            asset: asset.clone(),
            amount,
        },
    );
}

pub fn payout_failed(env: &Env, asset: &Address, participant: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("failure"), asset.clone()),
        PayoutFailed {
            participant: participant.clone(),
            asset: asset.clone(),
            amount,
        },
    );
}

pub fn reimbursed(env: &Env, event: Reimbursed) {
    env.events()
        .publish((symbol_short!("reimburse"), event.recipient.clone()), event);
}

pub fn fees_transferred(env: &Env, event: FeesTransferred) {
    env.events()
        .publish((symbol_short!("fees"), event.fee_manager.clone()), event);
}

pub fn airdropped(env: &Env, event: Airdropped) {
    env.events()
        .publish((symbol_short!("airdrop"), event.asset.clone()), event);
}

pub fn token_received(env: &Env, event: TokenReceived) {
    env.events()
        .publish((symbol_short!("tok_recv"), event.token.clone()), event);
}
