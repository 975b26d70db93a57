//! # Distribution
//!
//! Pro-rata payout of one asset (the pool currency or a received token).
//!
//! ```text
//! received = balance(asset) - reserved(asset) + distributed(asset)
//! owed     = floor(received * contribution / pool_total) - claimed(asset, participant)
//! ```
//!
//! `reserved` is the currency still owned by the ledger (`remaining_total`)
//! plus fees not yet sent to the fee manager; tokens reserve nothing.
//! Because `received` counts what was already paid, a top-up only adds its
//! own layer and a repeated call owes zero.
//!
//! Claims are written before the transfer. A rejected transfer restores the
//! claim, lands in the failures log and the batch moves on; the participant
//! is owed the same amount on the next call.

use soroban_sdk::{token, Address, Env};

use crate::events;
use crate::math::{checked_sum, pro_rata};
use crate::storage;
use crate::types::{Failure, Participant, PoolConfig, PoolState};
use crate::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Payout {
    Nothing,
    Paid(i128),
    Rejected(i128),
}

pub struct Distribution<'a> {
    env: &'a Env,
    asset: Address,
    client: token::Client<'a>,
    pool: Address,
    received: i128,
    denominator: i128,
}

impl<'a> Distribution<'a> {
    /// Snapshot the distributable amount of `asset`. Must be taken before any
    /// participant of the batch is paid.
    pub fn new(env: &'a Env, config: &PoolConfig, state: &PoolState, asset: &Address) -> Result<Self, Error> {
        let pool = env.current_contract_address();
        let client = token::Client::new(env, asset);

        let reserved = if *asset == config.currency {
            checked_sum(state.remaining_total, state.fees_owed)?
        } else {
            0
        };
        let available = (client.balance(&pool) - reserved).max(0);
        let received = checked_sum(available, storage::distributed(env, asset))?;

        Ok(Self {
            env,
            asset: asset.clone(),
            client,
            pool,
            received,
            denominator: state.pool_total,
        })
    }

    pub fn owed(&self, participant: &Address, record: &Participant) -> Result<i128, Error> {
        let entitled = pro_rata(self.received, record.contribution, self.denominator)?;
        let claimed = storage::claimed(self.env, &self.asset, participant);
        Ok((entitled - claimed).max(0))
    }

    pub fn pay_share(&self, participant: &Address, record: &Participant) -> Result<Payout, Error> {
        let share = self.owed(participant, record)?;
        if share == 0 {
            return Ok(Payout::Nothing);
        }

        self.record_claim(participant, share);
        if self.send(participant, share) {
            return Ok(Payout::Paid(share));
        }
        self.record_claim(participant, -share);
        self.reject(participant, share);
        Ok(Payout::Rejected(share))
    }

    /// Pay the participant's `remaining` bucket together with its currency
    /// share. Only meaningful when the asset is the pool currency.
    pub fn refund(
        &self,
        state: &mut PoolState,
        participant: &Address,
        record: &mut Participant,
    ) -> Result<Payout, Error> {
        let share = self.owed(participant, record)?;
        let leftover = record.remaining;
        let amount = checked_sum(share, leftover)?;
        if amount == 0 {
            return Ok(Payout::Nothing);
        }

        self.record_claim(participant, share);
        record.remaining = 0;
        state.remaining_total -= leftover;
        storage::save_participant(self.env, participant, record);

        if self.send(participant, amount) {
            return Ok(Payout::Paid(amount));
        }

        self.record_claim(participant, -share);
        record.remaining = leftover;
        state.remaining_total += leftover;
        storage::save_participant(self.env, participant, record);
        self.reject(participant, amount);
        Ok(Payout::Rejected(amount))
    }

    /// Pay the share of every known participant in `recipients`; unknown
    /// addresses are ignored. Returns the total delivered.
    pub fn pay_many<I>(&self, recipients: I) -> Result<i128, Error>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut paid = 0i128;
        for address in recipients {
            let Some(record) = storage::find_participant(self.env, &address) else {
                continue;
            };
            if let Payout::Paid(amount) = self.pay_share(&address, &record)? {
                paid += amount;
            }
        }
        Ok(paid)
    }

    /// [`Self::refund`] for every known participant in `recipients`.
    pub fn refund_many<I>(&self, state: &mut PoolState, recipients: I) -> Result<i128, Error>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut paid = 0i128;
        for address in recipients {
            let Some(mut record) = storage::find_participant(self.env, &address) else {
                continue;
            };
            if let Payout::Paid(amount) = self.refund(state, &address, &mut record)? {
                paid += amount;
            }
        }
        Ok(paid)
    }

    fn record_claim(&self, participant: &Address, delta: i128) {
        if delta == 0 {
            return;
        }
        let claimed = storage::claimed(self.env, &self.asset, participant);
        storage::set_claimed(self.env, &self.asset, participant, claimed + delta);
        let distributed = storage::distributed(self.env, &self.asset);
        storage::set_distributed(self.env, &self.asset, distributed + delta);
    }

    fn send(&self, to: &Address, amount: i128) -> bool {
        let delivered = matches!(self.client.try_transfer(&self.pool, to, &amount), Ok(Ok(())));
        if delivered {
            events::payout_sent(self.env, &self.asset, to, amount);
        }
        delivered
    }

    fn reject(&self, participant: &Address, amount: i128) {
        storage::push_failure(
            self.env,
            &Failure {
                participant: participant.clone(),
                asset: self.asset.clone(),
                amount,
            },
        );
        events::payout_failed(self.env, &self.asset, participant, amount);
    }
}

/// Addresses at `[start, start + limit)` of the participant index.
pub fn participant_range(env: &Env, start: u32, limit: u32) -> impl Iterator<Item = Address> + '_ {
    let end = start.saturating_add(limit).min(storage::participant_count(env));
    (start..end).filter_map(move |index| storage::participant_at(env, index))
}
