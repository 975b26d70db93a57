//! # Presale Pool Contract
//!
//! Pools currency from many contributors, forwards it to a presale and
//! hands the received token (or the currency, when the presale does not go
//! ahead) back to contributors pro-rata.
//!
//! | Phase        | Entry Point(s)                                                   |
//! |--------------|------------------------------------------------------------------|
//! | Bootstrap    | [`PresalePool::init`]                                            |
//! | Contributing | `deposit`, `withdraw`, `withdraw_all`                            |
//! | Policy       | `set_contribution_settings`, `modify_whitelist`, `remove_whitelist(_range)`, `set_token_drops` |
//! | Lifecycle    | `close`, `open`, `fail`, `pay_to_presale`                        |
//! | Presale side | `confirm_tokens`, `set_token`, `refund_presale`, `expect_refund`, `forward_transaction`, `on_token_received` |
//! | Distribution | `transfer_tokens_to`, `transfer_tokens_to_all`, `transfer_tokens_to_range`, `transfer_my_tokens`, `withdraw_all_for_many` |
//! | Airdrops     | `airdrop_currency`, `airdrop_tokens`                             |
//! | Fees         | `transfer_fees`, `transfer_and_distribute_fees`, `discount_fees` |
//! | Queries      | `get_pool`, `status`, `pool_total`, `pool_balance`, `participant`, `participants`, `failures`, … |
//!
//! ## Architecture
//!
//! Balance bookkeeping lives in [`ledger`], status gating in [`lifecycle`],
//! pro-rata payout in [`distribution`] and storage access in [`storage`].
//! This file loads state, calls into those modules, persists the result and
//! only then performs outbound calls.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, token, vec, Address, Env, Symbol, Val, Vec,
};

mod access;
mod distribution;
mod events;
mod fees;
mod ledger;
mod lifecycle;
mod math;
mod presale;
mod reimbursement;
mod storage;
mod types;

#[cfg(test)]
mod test_chaining;
#[cfg(test)]
mod test_distribution;
#[cfg(test)]
mod test_fees;
#[cfg(test)]
mod test_lifecycle;

use distribution::{Distribution, Payout};
use lifecycle::{ACCEPTING_CHANGES, SETTLING};

pub use events::{
    Airdropped, Deposited, FeesTransferred, PayoutFailed, PayoutSent, PoolInitialized,
    PresalePaid, Reimbursed, StatusChanged, TokenReceived, TokensConfirmed, WhitelistChanged,
    Withdrawn,
};
pub use fees::{FeeManagerClient, MAX_FEE_RATE};
pub use math::ONE_UNIT;
pub use reimbursement::{MAX_TOKEN_DROPS, TRANSFER_COST_UNITS};
pub use types::{
    ContributionLimits, Failure, ParticipantBalance, Pool, PoolParams, PoolStatus, Role,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized          = 1,
    NotInitialized              = 2,
    NotAuthorized               = 3,
    InvalidState                = 4,
    NotWhitelisted              = 5,
    InvalidAmount               = 6,
    InsufficientBalance         = 7,
    BelowMinContribution        = 8,
    InvalidContributionSettings = 9,
    FeeTooHigh                  = 10,
    TooManyTokenDrops           = 11,
    ReimbursementTooHigh        = 12,
    InvalidToken                = 13,
    NoTokenBalance              = 14,
    NothingToTransfer           = 15,
    RefundTooSmall              = 16,
    PoolBalanceTooLow           = 17,
    PartialWithdrawal           = 18,
    InvalidTarget               = 19,
    AirdropTooSmall             = 20,
    TransferFailed              = 21,
    MathOverflow                = 22,
}

#[contract]
pub struct PresalePool;

#[contractimpl]
impl PresalePool {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Validate `params`, store the pool and register it with the fee manager.
    ///
    /// Must be called exactly once; later calls fail with
    /// `Error::AlreadyInitialized`. An unusable fee manager aborts the call.
    pub fn init(env: Env, creator: Address, params: PoolParams) -> Result<(), Error> {
        creator.require_auth();
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        ledger::validate_limits(&params.limits)?;
        fees::validate_rate(params.fees_per_unit)?;
        if params.max_unit_price < 0 {
            return Err(Error::InvalidAmount);
        }
        reimbursement::validate(&params.limits, params.total_token_drops, params.max_unit_price)?;

        let config = types::PoolConfig {
            creator: creator.clone(),
            currency: params.currency,
            fee_manager: params.fee_manager,
            fees_per_unit: params.fees_per_unit,
            max_unit_price: params.max_unit_price,
            admins: access::normalize_admins(&env, &creator, &params.admins),
        };
        let state = types::PoolState {
            status: PoolStatus::Open,
            pool_total: 0,
            remaining_total: 0,
            contributors: 0,
            limits: params.limits.clone(),
            restricted: params.restricted,
            fees_owed: 0,
            token: None,
            auto_distribute: false,
            total_token_drops: params.total_token_drops,
            auto_distribute_recipient: params.auto_distribute_recipient,
            refund_sender: None,
            payout_reimbursement: 0,
        };

        for address in params.whitelist.iter() {
            let mut record = storage::load_participant(&env, &address, true);
            record.whitelisted = true;
            storage::save_participant(&env, &address, &record);
        }
        storage::save_config(&env, &config);
        storage::save_state(&env, &state);

        let recipients = if params.fee_recipients.is_empty() {
            vec![&env, creator.clone()]
        } else {
            params.fee_recipients
        };
        fees::client(&env, &config).create(
            &env.current_contract_address(),
            &config.fees_per_unit,
            &recipients,
        );

        events::initialized(
            &env,
            PoolInitialized {
                creator,
                currency: config.currency,
                fee_manager: config.fee_manager,
                limits: params.limits,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Contributing
    // ─────────────────────────────────────────────────────────

    /// Deposit `amount` of currency. Open pools only.
    ///
    /// The accepted part counts toward the pool total; anything over the
    /// limits is kept in the participant's `remaining` bucket. Another
    /// contract may call this with itself as `participant` to chain pools.
    pub fn deposit(env: Env, participant: Address, amount: i128) -> Result<(), Error> {
        participant.require_auth();
        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::Open])?;

        let mut record = storage::load_participant(&env, &participant, state.restricted);
        ledger::deposit(&mut state, &mut record, amount)?;
        storage::save_participant(&env, &participant, &record);
        storage::save_state(&env, &state);

        token::Client::new(&env, &config.currency).transfer(
            &participant,
            &env.current_contract_address(),
            &amount,
        );
        events::deposited(&env, &participant, amount, &record);
        Ok(())
    }

    /// Withdraw `amount` of the caller's balance.
    ///
    /// While Open/Closed, `amount <= 0` releases the `remaining` bucket.
    /// Afterwards only full withdrawals are possible and `amount <= 0`
    /// behaves like [`PresalePool::withdraw_all`].
    pub fn withdraw(env: Env, participant: Address, amount: i128) -> Result<i128, Error> {
        participant.require_auth();
        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if !lifecycle::accepts_changes(&state) {
            if amount > 0 {
                return Err(Error::PartialWithdrawal);
            }
            return settle_one(&env, &config, &mut state, &participant);
        }

        let mut record = storage::load_participant(&env, &participant, state.restricted);
        let released = ledger::withdraw(&mut state, &mut record, amount)?;
        if released == 0 {
            return Ok(0);
        }
        storage::save_participant(&env, &participant, &record);
        storage::save_state(&env, &state);

        pay_out(&env, &config, &participant, released);
        Ok(released)
    }

    /// Withdraw everything the caller is owed in currency.
    ///
    /// While Open/Closed that is the whole ledger balance. Afterwards it is
    /// the `remaining` bucket plus the pro-rata share of any currency the
    /// pool holds for contributors (refunds, airdrops).
    pub fn withdraw_all(env: Env, participant: Address) -> Result<i128, Error> {
        participant.require_auth();
        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if !lifecycle::accepts_changes(&state) {
            return settle_one(&env, &config, &mut state, &participant);
        }

        let Some(mut record) = storage::find_participant(&env, &participant) else {
            return Ok(0);
        };
        let released = ledger::withdraw_all(&mut state, &mut record);
        if released == 0 {
            return Ok(0);
        }
        storage::save_participant(&env, &participant, &record);
        storage::save_state(&env, &state);

        pay_out(&env, &config, &participant, released);
        Ok(released)
    }

    /// Pay each listed participant its currency entitlement. Anyone may call
    /// this once the pool has left Open/Closed; funds only ever go to their
    /// owner, and rejected transfers are logged instead of aborting.
    pub fn withdraw_all_for_many(env: Env, participants: Vec<Address>) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &SETTLING)?;

        let distribution = Distribution::new(&env, &config, &state, &config.currency)?;
        let paid = distribution.refund_many(&mut state, participants)?;
        storage::save_state(&env, &state);
        Ok(paid)
    }

    // ─────────────────────────────────────────────────────────
    // Contribution policy
    // ─────────────────────────────────────────────────────────

    /// Change contribution limits. Creator or admin, Open/Closed only.
    ///
    /// Participants listed in `rebalance` are re-settled against the new
    /// limits right away; everyone else is re-checked on their next deposit
    /// or withdrawal.
    pub fn set_contribution_settings(
        env: Env,
        caller: Address,
        min_contribution: i128,
        max_contribution: i128,
        max_pool_balance: i128,
        rebalance: Vec<Address>,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator_or_admin(&config, &caller)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        let limits = ContributionLimits {
            min_contribution,
            max_contribution,
            max_pool_balance,
        };
        ledger::validate_limits(&limits)?;
        reimbursement::validate(&limits, state.total_token_drops, config.max_unit_price)?;

        events::settings_changed(&env, &limits);
        state.limits = limits;
        for address in rebalance.iter() {
            let Some(mut record) = storage::find_participant(&env, &address) else {
                continue;
            };
            ledger::settle(&mut state, &mut record);
            storage::save_participant(&env, &address, &record);
        }
        storage::save_state(&env, &state);
        Ok(())
    }

    /// Whitelist `add` and evict `remove`. Creator only, Open/Closed.
    ///
    /// An evicted participant's contribution moves to `remaining`; re-adding
    /// promotes whatever fits the current limits back into `contribution`.
    pub fn modify_whitelist(
        env: Env,
        caller: Address,
        add: Vec<Address>,
        remove: Vec<Address>,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        for (addresses, whitelisted) in [(remove, false), (add, true)] {
            for address in addresses.iter() {
                let mut record = storage::load_participant(&env, &address, state.restricted);
                ledger::set_whitelisted(&mut state, &mut record, whitelisted);
                storage::save_participant(&env, &address, &record);
                events::whitelist_changed(&env, &address, &record);
            }
        }

        storage::save_state(&env, &state);
        Ok(())
    }

    /// Lift the whitelist: every known participant is whitelisted and
    /// re-settled, and new addresses may deposit.
    pub fn remove_whitelist(env: Env, caller: Address) -> Result<(), Error> {
        Self::remove_whitelist_range(env, caller, 0, u32::MAX)
    }

    /// [`PresalePool::remove_whitelist`] over one page of the participant
    /// index. The pool is unrestricted after the first page; listed
    /// participants on later pages stay evicted until their page runs.
    pub fn remove_whitelist_range(env: Env, caller: Address, start: u32, limit: u32) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        state.restricted = false;
        for address in distribution::participant_range(&env, start, limit) {
            let mut record = storage::load_participant(&env, &address, false);
            if !record.whitelisted {
                ledger::set_whitelisted(&mut state, &mut record, true);
                storage::save_participant(&env, &address, &record);
            }
        }

        storage::save_state(&env, &state);
        events::whitelist_removed(&env, &caller);
        Ok(())
    }

    /// Change the number of reimbursed distribution passes. Creator only.
    pub fn set_token_drops(env: Env, caller: Address, drops: u32) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        reimbursement::validate(&state.limits, drops, config.max_unit_price)?;
        state.total_token_drops = drops;
        storage::save_state(&env, &state);
        events::token_drops_changed(&env, drops);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────

    pub fn close(env: Env, caller: Address) -> Result<(), Error> {
        move_to(&env, &caller, PoolStatus::Closed)
    }

    pub fn open(env: Env, caller: Address) -> Result<(), Error> {
        move_to(&env, &caller, PoolStatus::Open)
    }

    /// Cancel the pool. Contributions become refundable pro-rata after one
    /// drop of gas reimbursement.
    pub fn fail(env: Env, caller: Address, unit_price: i128) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;

        lifecycle::transition(&env, &mut state, PoolStatus::Failed)?;
        // Never reach into the `remaining` buckets.
        let reimbursement = reimbursement::cost(&config, &state, 1, unit_price)?.min(state.pool_total);
        storage::save_state(&env, &state);

        reimbursement::pay(&env, &config, &state, &env.current_contract_address(), reimbursement, 1);
        Ok(())
    }

    /// Forward the pool total, net of fees and reimbursement, to `target`.
    ///
    /// - `min_pool_balance` guards against a pool drained since the creator
    ///   prepared the call.
    /// - `extra_value` is pulled from the creator and forwarded as well.
    /// - With `callback`, `target.callback(pool, amount)` is invoked and may
    ///   pull the amount itself (e.g. another pool's `deposit`).
    ///
    /// Returns the amount forwarded.
    pub fn pay_to_presale(
        env: Env,
        caller: Address,
        target: Address,
        min_pool_balance: i128,
        extra_value: i128,
        callback: Option<Symbol>,
        unit_price: i128,
    ) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        let pool = env.current_contract_address();
        if target == pool || target == config.currency {
            return Err(Error::InvalidTarget);
        }
        if state.pool_total < min_pool_balance {
            return Err(Error::PoolBalanceTooLow);
        }
        if extra_value < 0 {
            return Err(Error::InvalidAmount);
        }

        let rate = fees::client(&env, &config).fee_rate(&pool);
        let fees = math::apply_rate(state.pool_total, rate)?;
        let drops = state.total_token_drops;
        let reimbursement = reimbursement::cost(&config, &state, drops, unit_price)?;
        let forwarded = state.pool_total - fees - reimbursement;
        if forwarded < 0 {
            return Err(Error::InsufficientBalance);
        }
        let amount = math::checked_sum(forwarded, extra_value)?;

        lifecycle::transition(&env, &mut state, PoolStatus::Paid)?;
        state.fees_owed = fees;
        state.payout_reimbursement = reimbursement;
        storage::save_state(&env, &state);

        let currency = token::Client::new(&env, &config.currency);
        if extra_value > 0 {
            currency.transfer(&caller, &pool, &extra_value);
        }
        reimbursement::pay(&env, &config, &state, &pool, reimbursement, drops);
        presale::forward(&env, &config.currency, &target, amount, &callback);

        events::presale_paid(
            &env,
            PresalePaid {
                target,
                amount,
                fees,
                reimbursement,
            },
        );
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Presale side
    // ─────────────────────────────────────────────────────────

    /// Confirm the token delivered by the presale. Irrevocable; the pool must
    /// already hold a non-zero balance of `token`.
    pub fn confirm_tokens(env: Env, caller: Address, token: Address, auto_distribute: bool) -> Result<(), Error> {
        confirm(&env, &caller, &token, auto_distribute)
    }

    /// [`PresalePool::confirm_tokens`] without auto-distribution.
    pub fn set_token(env: Env, caller: Address, token: Address) -> Result<(), Error> {
        confirm(&env, &caller, &token, false)
    }

    /// Anyone may flag a refund once the presale has sent back everything
    /// it was forwarded from pooled funds. The pool total less the payout
    /// reimbursement must then be covered by the held fees, the returned
    /// currency and whatever contributors already withdrew of it.
    ///
    /// The held fees are released: contributors withdraw pro-rata and the
    /// fee manager gets nothing.
    pub fn refund_presale(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::Paid])?;

        let held = currency_balance(&env, &config) - state.remaining_total;
        let received = math::checked_sum(held, storage::distributed(&env, &config.currency))?;
        if received < state.pool_total - state.payout_reimbursement {
            return Err(Error::RefundTooSmall);
        }

        lifecycle::transition(&env, &mut state, PoolStatus::Refund)?;
        state.fees_owed = 0;
        storage::save_state(&env, &state);
        Ok(())
    }

    /// Switch to refund mode ahead of a refund that `refund_sender` must be
    /// asked for, e.g. through [`PresalePool::forward_transaction`].
    pub fn expect_refund(env: Env, caller: Address, refund_sender: Address) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let mut state = storage::load_state(&env)?;

        lifecycle::transition(&env, &mut state, PoolStatus::Refund)?;
        state.refund_sender = Some(refund_sender.clone());
        state.fees_owed = 0;
        storage::save_state(&env, &state);
        events::refund_expected(&env, &refund_sender);
        Ok(())
    }

    /// Invoke `function(args)` on the expected refund sender on behalf of
    /// the pool, e.g. `withdraw_all(pool)` on an upstream pool.
    pub fn forward_transaction(
        env: Env,
        caller: Address,
        target: Address,
        function: Symbol,
        args: Vec<Val>,
    ) -> Result<Val, Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::Refund])?;

        if state.refund_sender != Some(target.clone()) {
            return Err(Error::InvalidTarget);
        }
        Ok(env.invoke_contract::<Val>(&target, &function, args))
    }

    /// Notification hook for token contracts that announce transfers.
    pub fn on_token_received(env: Env, token: Address, from: Address, amount: i128) -> Result<(), Error> {
        let state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::Paid, PoolStatus::TokensReady])?;
        events::token_received(&env, TokenReceived { token, from, amount });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Token distribution
    // ─────────────────────────────────────────────────────────

    /// Pay each listed participant its outstanding share of `token`.
    pub fn transfer_tokens_to(env: Env, token: Address, recipients: Vec<Address>) -> Result<i128, Error> {
        let (config, state) = token_distribution(&env, &token)?;
        Distribution::new(&env, &config, &state, &token)?.pay_many(recipients)
    }

    pub fn transfer_tokens_to_all(env: Env, token: Address) -> Result<i128, Error> {
        Self::transfer_tokens_to_range(env, token, 0, u32::MAX)
    }

    /// Page through the participant index; `start` is an index position.
    pub fn transfer_tokens_to_range(env: Env, token: Address, start: u32, limit: u32) -> Result<i128, Error> {
        let (config, state) = token_distribution(&env, &token)?;
        let distribution = Distribution::new(&env, &config, &state, &token)?;
        distribution.pay_many(distribution::participant_range(&env, start, limit))
    }

    /// Claim the caller's share of the confirmed token.
    pub fn transfer_my_tokens(env: Env, participant: Address) -> Result<i128, Error> {
        participant.require_auth();
        let state = storage::load_state(&env)?;
        let token = state.token.ok_or(Error::InvalidState)?;
        let (config, state) = token_distribution(&env, &token)?;

        let Some(record) = storage::find_participant(&env, &participant) else {
            return Ok(0);
        };
        match Distribution::new(&env, &config, &state, &token)?.pay_share(&participant, &record)? {
            Payout::Paid(amount) => Ok(amount),
            Payout::Nothing => Ok(0),
            Payout::Rejected(_) => Err(Error::TransferFailed),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Airdrops
    // ─────────────────────────────────────────────────────────

    /// Send currency to contributors. One drop of reimbursement is taken out
    /// of `amount` when auto-distribution is on; the rest becomes
    /// withdrawable pro-rata. Returns the distributable part.
    pub fn airdrop_currency(env: Env, caller: Address, amount: i128, unit_price: i128) -> Result<i128, Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::TokensReady])?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let reimbursement = airdrop_reimbursement(&config, &state, unit_price)?;
        if reimbursement > 0 && amount <= reimbursement {
            return Err(Error::AirdropTooSmall);
        }

        let pool = env.current_contract_address();
        token::Client::new(&env, &config.currency).transfer(&caller, &pool, &amount);
        reimbursement::pay(&env, &config, &state, &pool, reimbursement, 1);

        let distributable = amount - reimbursement;
        events::airdropped(
            &env,
            Airdropped {
                sender: caller,
                asset: config.currency,
                amount: distributable,
            },
        );
        Ok(distributable)
    }

    /// Announce a token airdrop already sent to the pool. The caller pays one
    /// drop of reimbursement when auto-distribution is on. Returns the pool's
    /// balance of `token`.
    pub fn airdrop_tokens(env: Env, caller: Address, token: Address, unit_price: i128) -> Result<i128, Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &[PoolStatus::TokensReady])?;
        if token == config.currency {
            return Err(Error::InvalidToken);
        }

        let balance = token::Client::new(&env, &token).balance(&env.current_contract_address());
        if balance <= 0 {
            return Err(Error::NoTokenBalance);
        }

        let reimbursement = airdrop_reimbursement(&config, &state, unit_price)?;
        reimbursement::pay(&env, &config, &state, &caller, reimbursement, 1);

        events::airdropped(
            &env,
            Airdropped {
                sender: caller,
                asset: token,
                amount: balance,
            },
        );
        Ok(balance)
    }

    // ─────────────────────────────────────────────────────────
    // Fees
    // ─────────────────────────────────────────────────────────

    /// Send the fees deducted at payout to the fee manager. Only once the
    /// presale delivered tokens; a refunded pool returns its fees to
    /// contributors instead.
    pub fn transfer_fees(env: Env) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        send_fees(&env, &config)
    }

    /// [`PresalePool::transfer_fees`], then have the fee manager push every
    /// recipient its share.
    pub fn transfer_and_distribute_fees(env: Env) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        let amount = send_fees(&env, &config)?;
        fees::client(&env, &config).distribute_fees(&env.current_contract_address());
        Ok(amount)
    }

    /// Ask the fee manager to lower this pool's rates. `team_member` must
    /// sign the new rates.
    pub fn discount_fees(
        env: Env,
        caller: Address,
        team_member: Address,
        team_rate: i128,
        recipients_rate: i128,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        access::require_creator(&config, &caller)?;
        let state = storage::load_state(&env)?;
        lifecycle::require_status(&state, &ACCEPTING_CHANGES)?;

        fees::client(&env, &config).discount_fees(
            &env.current_contract_address(),
            &team_member,
            &team_rate,
            &recipients_rate,
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_pool(env: Env) -> Result<Pool, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env)?;
        Ok(Pool {
            creator: config.creator,
            currency: config.currency,
            fee_manager: config.fee_manager,
            fees_per_unit: config.fees_per_unit,
            admins: config.admins,
            status: state.status,
            pool_total: state.pool_total,
            remaining_total: state.remaining_total,
            contributors: state.contributors,
            limits: state.limits,
            restricted: state.restricted,
            fees_owed: state.fees_owed,
            token: state.token,
            total_token_drops: state.total_token_drops,
        })
    }

    pub fn status(env: Env) -> Result<PoolStatus, Error> {
        Ok(storage::load_state(&env)?.status)
    }

    pub fn pool_total(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.pool_total)
    }

    /// Currency held by the pool.
    pub fn pool_balance(env: Env) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        Ok(currency_balance(&env, &config))
    }

    pub fn fees_owed(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.fees_owed)
    }

    pub fn total_token_drops(env: Env) -> Result<u32, Error> {
        Ok(storage::load_state(&env)?.total_token_drops)
    }

    pub fn participant(env: Env, address: Address) -> Result<ParticipantBalance, Error> {
        let state = storage::load_state(&env)?;
        let record = storage::load_participant(&env, &address, state.restricted);
        Ok(balance_view(address, record))
    }

    /// Every ledger entry in index order.
    pub fn participant_balances(env: Env) -> Result<Vec<ParticipantBalance>, Error> {
        Self::participants(env, 0, u32::MAX)
    }

    pub fn participants(env: Env, start: u32, limit: u32) -> Result<Vec<ParticipantBalance>, Error> {
        let state = storage::load_state(&env)?;
        let mut balances = Vec::new(&env);
        for address in distribution::participant_range(&env, start, limit) {
            let record = storage::load_participant(&env, &address, state.restricted);
            balances.push_back(balance_view(address, record));
        }
        Ok(balances)
    }

    pub fn participant_count(env: Env) -> u32 {
        storage::participant_count(&env)
    }

    /// Amount of `asset` already paid to `participant` by distributions.
    pub fn claimed(env: Env, asset: Address, participant: Address) -> i128 {
        storage::claimed(&env, &asset, &participant)
    }

    pub fn failures(env: Env, start: u32, limit: u32) -> Vec<Failure> {
        let end = start.saturating_add(limit).min(storage::failure_count(&env));
        let mut log = Vec::new(&env);
        for index in start..end {
            if let Some(failure) = storage::failure_at(&env, index) {
                log.push_back(failure);
            }
        }
        log
    }

    pub fn failure_count(env: Env) -> u32 {
        storage::failure_count(&env)
    }

    pub fn role_of(env: Env, address: Address) -> Result<Option<Role>, Error> {
        let config = storage::load_config(&env)?;
        Ok(access::role_of(&config, &address))
    }
}

// ─────────────────────────────────────────────────────────
// Shared steps
// ─────────────────────────────────────────────────────────

fn move_to(env: &Env, caller: &Address, to: PoolStatus) -> Result<(), Error> {
    let config = storage::load_config(env)?;
    access::require_creator(&config, caller)?;
    let mut state = storage::load_state(env)?;
    lifecycle::transition(env, &mut state, to)?;
    storage::save_state(env, &state);
    Ok(())
}

fn confirm(env: &Env, caller: &Address, token: &Address, auto_distribute: bool) -> Result<(), Error> {
    let config = storage::load_config(env)?;
    access::require_creator(&config, caller)?;
    let mut state = storage::load_state(env)?;
    lifecycle::require_status(&state, &[PoolStatus::Paid])?;

    if *token == config.currency {
        return Err(Error::InvalidToken);
    }
    let balance = token::Client::new(env, token).balance(&env.current_contract_address());
    if balance <= 0 {
        return Err(Error::NoTokenBalance);
    }

    lifecycle::transition(env, &mut state, PoolStatus::TokensReady)?;
    state.token = Some(token.clone());
    state.auto_distribute = auto_distribute;
    storage::save_state(env, &state);

    events::tokens_confirmed(
        env,
        TokensConfirmed {
            token: token.clone(),
            balance,
            auto_distribute,
        },
    );
    Ok(())
}

/// Full currency payout of one participant after the pool left Open/Closed.
fn settle_one(
    env: &Env,
    config: &types::PoolConfig,
    state: &mut types::PoolState,
    participant: &Address,
) -> Result<i128, Error> {
    let Some(mut record) = storage::find_participant(env, participant) else {
        return Ok(0);
    };
    let distribution = Distribution::new(env, config, state, &config.currency)?;
    match distribution.refund(state, participant, &mut record)? {
        Payout::Paid(amount) => {
            storage::save_state(env, state);
            events::withdrawn(env, participant, amount);
            Ok(amount)
        }
        Payout::Nothing => Ok(0),
        Payout::Rejected(_) => Err(Error::TransferFailed),
    }
}

fn pay_out(env: &Env, config: &types::PoolConfig, participant: &Address, amount: i128) {
    token::Client::new(env, &config.currency).transfer(
        &env.current_contract_address(),
        participant,
        &amount,
    );
    events::withdrawn(env, participant, amount);
}

fn token_distribution(env: &Env, token: &Address) -> Result<(types::PoolConfig, types::PoolState), Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env)?;
    lifecycle::require_status(&state, &[PoolStatus::TokensReady])?;
    if *token == config.currency {
        return Err(Error::InvalidToken);
    }
    Ok((config, state))
}

fn airdrop_reimbursement(
    config: &types::PoolConfig,
    state: &types::PoolState,
    unit_price: i128,
) -> Result<i128, Error> {
    if !state.auto_distribute {
        return Ok(0);
    }
    reimbursement::cost(config, state, 1, unit_price)
}

fn send_fees(env: &Env, config: &types::PoolConfig) -> Result<i128, Error> {
    let mut state = storage::load_state(env)?;
    lifecycle::require_status(&state, &[PoolStatus::TokensReady])?;
    if state.fees_owed <= 0 {
        return Err(Error::NothingToTransfer);
    }

    let amount = state.fees_owed;
    state.fees_owed = 0;
    storage::save_state(env, &state);

    let pool = env.current_contract_address();
    presale::authorize_pull(env, &config.currency, &config.fee_manager, amount);
    fees::client(env, config).collect_fees(&pool, &amount);

    events::fees_transferred(
        env,
        FeesTransferred {
            fee_manager: config.fee_manager.clone(),
            amount,
        },
    );
    Ok(amount)
}

fn currency_balance(env: &Env, config: &types::PoolConfig) -> i128 {
    token::Client::new(env, &config.currency).balance(&env.current_contract_address())
}

fn balance_view(address: Address, record: types::Participant) -> ParticipantBalance {
    ParticipantBalance {
        address,
        contribution: record.contribution,
        remaining: record.remaining,
        whitelisted: record.whitelisted,
        exists: record.exists,
    }
}
