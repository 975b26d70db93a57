extern crate std;

use soroban_sdk::{symbol_short, testutils::Address as _, vec, Address, IntoVal, Symbol};

use crate::invariants::assert_valid_status_transition;
use crate::testutils::{setup, setup_with, UNIT};
use crate::{Error, PoolStatus, Role};

#[test]
fn test_init_sets_open_pool() {
    let s = setup();
    let pool = s.pool.get_pool();

    assert_eq!(pool.status, PoolStatus::Open);
    assert_eq!(pool.creator, s.creator);
    assert_eq!(pool.currency, s.currency.address);
    assert_eq!(pool.fee_manager, s.fee_manager.address);
    assert_eq!(pool.pool_total, 0);
    assert_eq!(s.fee_manager.fee_rate(&s.pool.address), 0);
}

#[test]
fn test_init_only_once() {
    let s = setup();
    let params = crate::testutils::params(&s.env, &s.currency.address, &s.fee_manager.address);
    assert_eq!(
        s.pool.try_init(&s.creator, &params),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_uninitialized_pool_reports_it() {
    let s = setup();
    let id = s.env.register(crate::PresalePool, ());
    let pool = crate::PresalePoolClient::new(&s.env, &id);
    assert_eq!(pool.try_status(), Err(Ok(Error::NotInitialized)));
}

#[test]
fn test_roles() {
    let s = setup();
    let admin = Address::generate(&s.env);
    let pool = s.other_pool(|p| p.admins = vec![&s.env, admin.clone(), s.creator.clone()]);

    assert_eq!(pool.role_of(&s.creator), Some(Role::Creator));
    assert_eq!(pool.role_of(&admin), Some(Role::Admin));
    assert_eq!(pool.role_of(&Address::generate(&s.env)), None);
    assert_eq!(pool.get_pool().admins.len(), 1);
}

#[test]
fn test_close_pauses_deposits_and_open_resumes() {
    let s = setup();
    let alice = s.contributor(UNIT);

    s.pool.close(&s.creator);
    assert_eq!(s.pool.status(), PoolStatus::Closed);
    s.fund(&alice, UNIT);
    assert_eq!(s.pool.try_deposit(&alice, &UNIT), Err(Ok(Error::InvalidState)));

    s.pool.open(&s.creator);
    s.pool.deposit(&alice, &UNIT);
    assert_eq!(s.pool.pool_total(), 2 * UNIT);
    assert_valid_status_transition(PoolStatus::Closed, PoolStatus::Open);
}

#[test]
fn test_only_creator_moves_status() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    assert_eq!(s.pool.try_close(&stranger), Err(Ok(Error::NotAuthorized)));
    assert_eq!(s.pool.try_fail(&stranger, &0), Err(Ok(Error::NotAuthorized)));
}

#[test]
fn test_failed_pool_is_terminal() {
    let s = setup();
    s.pool.fail(&s.creator, &0);

    assert_eq!(s.pool.status(), PoolStatus::Failed);
    assert_eq!(s.pool.try_open(&s.creator), Err(Ok(Error::InvalidState)));
    assert_eq!(s.pool.try_close(&s.creator), Err(Ok(Error::InvalidState)));
    let presale = Address::generate(&s.env);
    assert_eq!(
        s.pool
            .try_pay_to_presale(&s.creator, &presale, &0, &0, &None, &0),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_failed_pool_refunds_contributors() {
    let s = setup();
    let alice = s.contributor(5 * UNIT);
    let bob = s.contributor(3 * UNIT);
    s.pool.fail(&s.creator, &0);

    assert_eq!(s.pool.withdraw_all(&alice), 5 * UNIT);
    assert_eq!(s.pool.withdraw(&bob, &0), 3 * UNIT);
    assert_eq!(s.pool.withdraw_all(&alice), 0);
    assert_eq!(s.pool.pool_balance(), 0);
}

#[test]
fn test_settled_pool_rejects_partial_withdrawal() {
    let s = setup();
    let alice = s.contributor(5 * UNIT);
    s.pool.fail(&s.creator, &0);
    assert_eq!(
        s.pool.try_withdraw(&alice, &UNIT),
        Err(Ok(Error::PartialWithdrawal))
    );
}

#[test]
fn test_remaining_is_refunded_after_payout() {
    let s = setup_with(|p| p.limits.max_contribution = 4 * UNIT);
    let alice = s.contributor(6 * UNIT);
    s.pay_out();

    assert_eq!(s.pool.status(), PoolStatus::Paid);
    assert_eq!(s.pool.withdraw_all(&alice), 2 * UNIT);
    assert_eq!(s.pool.participant(&alice).remaining, 0);
    assert_eq!(s.pool.withdraw_all(&alice), 0);
}

#[test]
fn test_pay_to_presale_forwards_pool_total() {
    let s = setup();
    s.contributor(5 * UNIT);
    s.contributor(3 * UNIT);

    let presale = s.pay_out();
    assert_eq!(s.currency.balance(&presale), 8 * UNIT);
    assert_eq!(s.pool.pool_balance(), 0);
    assert_eq!(s.pool.status(), PoolStatus::Paid);
    assert_eq!(s.pool.pool_total(), 8 * UNIT);
}

#[test]
fn test_pay_to_presale_adds_extra_value() {
    let s = setup();
    s.contributor(5 * UNIT);
    s.fund(&s.creator, UNIT);

    let presale = Address::generate(&s.env);
    let sent = s
        .pool
        .pay_to_presale(&s.creator, &presale, &(5 * UNIT), &UNIT, &None, &0);
    assert_eq!(sent, 6 * UNIT);
    assert_eq!(s.currency.balance(&presale), 6 * UNIT);
    assert_eq!(s.currency.balance(&s.creator), 0);
}

#[test]
fn test_pay_to_presale_guards() {
    let s = setup();
    s.contributor(5 * UNIT);
    let presale = Address::generate(&s.env);

    assert_eq!(
        s.pool
            .try_pay_to_presale(&s.creator, &s.pool.address, &0, &0, &None, &0),
        Err(Ok(Error::InvalidTarget))
    );
    assert_eq!(
        s.pool
            .try_pay_to_presale(&s.creator, &s.currency.address, &0, &0, &None, &0),
        Err(Ok(Error::InvalidTarget))
    );
    assert_eq!(
        s.pool
            .try_pay_to_presale(&s.creator, &presale, &(6 * UNIT), &0, &None, &0),
        Err(Ok(Error::PoolBalanceTooLow))
    );
    assert_eq!(
        s.pool
            .try_pay_to_presale(&s.creator, &presale, &0, &-1, &None, &0),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn test_paid_pool_accepts_no_changes() {
    let s = setup();
    let alice = s.contributor(5 * UNIT);
    s.pay_out();

    s.fund(&alice, UNIT);
    assert_eq!(s.pool.try_deposit(&alice, &UNIT), Err(Ok(Error::InvalidState)));
    assert_eq!(
        s.pool.try_set_contribution_settings(&s.creator, &0, &0, &0, &vec![&s.env]),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(s.pool.try_fail(&s.creator, &0), Err(Ok(Error::InvalidState)));
    assert_eq!(s.pool.try_set_token_drops(&s.creator, &1), Err(Ok(Error::InvalidState)));
}

#[test]
fn test_confirm_tokens_requires_token_balance() {
    let s = setup();
    s.contributor(5 * UNIT);
    s.pay_out();

    assert_eq!(
        s.pool.try_confirm_tokens(&s.creator, &s.currency.address, &false),
        Err(Ok(Error::InvalidToken))
    );
    let empty = s.token_in_pool(0);
    assert_eq!(
        s.pool.try_set_token(&s.creator, &empty.address),
        Err(Ok(Error::NoTokenBalance))
    );

    s.mint_token(&empty.address, 100);
    s.pool.set_token(&s.creator, &empty.address);
    let pool = s.pool.get_pool();
    assert_eq!(pool.status, PoolStatus::TokensReady);
    assert_eq!(pool.token, Some(empty.address.clone()));
    assert_eq!(
        s.pool.try_expect_refund(&s.creator, &Address::generate(&s.env)),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_confirm_tokens_before_payout_is_rejected() {
    let s = setup();
    let asset = s.token_in_pool(100);
    assert_eq!(
        s.pool.try_confirm_tokens(&s.creator, &asset.address, &false),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_refund_presale_requires_full_return() {
    let s = setup_with(|p| p.fees_per_unit = crate::ONE_UNIT / 100);
    let alice = s.contributor(10 * UNIT);
    let bob = s.contributor(20 * UNIT);
    let presale = s.pay_out();
    assert_eq!(s.currency.balance(&presale), 29_700_000 * 10);

    s.currency.transfer(&presale, &s.pool.address, &(29_000_000 * 10));
    assert_eq!(
        s.pool.try_refund_presale(&presale),
        Err(Ok(Error::RefundTooSmall))
    );

    s.currency.transfer(&presale, &s.pool.address, &(700_000 * 10));
    s.pool.refund_presale(&presale);
    assert_eq!(s.pool.status(), PoolStatus::Refund);

    // The fee held since payout goes back to contributors.
    assert_eq!(s.pool.fees_owed(), 0);
    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::InvalidState)));
    assert_eq!(
        s.pool.try_transfer_and_distribute_fees(),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(s.pool.withdraw_all(&alice), 10 * UNIT);
    assert_eq!(s.pool.withdraw_all(&bob), 20 * UNIT);
    assert_eq!(s.pool.pool_balance(), 0);
    assert_eq!(s.currency.balance(&s.fee_manager.address), 0);
}

#[test]
fn test_partial_return_is_withdrawable_while_paid() {
    let s = setup_with(|p| p.fees_per_unit = crate::ONE_UNIT / 100);
    let alice = s.contributor(10 * UNIT);
    let bob = s.contributor(20 * UNIT);
    let presale = s.pay_out();

    s.currency.transfer(&presale, &s.pool.address, &(90 * 1_000_000));
    assert_eq!(s.pool.withdraw_all(&alice), 30_000_000);
    assert_eq!(s.pool.status(), PoolStatus::Paid);
    assert_eq!(s.pool.fees_owed(), 3_000_000);
    assert_eq!(
        s.pool.try_refund_presale(&presale),
        Err(Ok(Error::RefundTooSmall))
    );

    // What alice already took counts toward the returned amount.
    s.currency.transfer(&presale, &s.pool.address, &(207 * 1_000_000));
    s.pool.refund_presale(&presale);
    assert_eq!(s.pool.withdraw_all(&alice), 70_000_000);
    assert_eq!(s.pool.withdraw_all(&bob), 20 * UNIT);
    assert_eq!(s.pool.pool_balance(), 0);
}

#[test]
fn test_refund_threshold_excludes_payout_reimbursement() {
    let s = setup_with(|p| {
        p.limits.min_contribution = 200_000;
        p.total_token_drops = 1;
        p.max_unit_price = 1;
        p.auto_distribute_recipient = Some(Address::generate(p.admins.env()));
    });
    let alice = s.contributor(1_000_000);
    let bob = s.contributor(1_000_000);

    let presale = Address::generate(&s.env);
    let sent = s
        .pool
        .pay_to_presale(&s.creator, &presale, &0, &0, &None, &1);
    assert_eq!(sent, 1_920_000);

    s.currency.transfer(&presale, &s.pool.address, &(sent - 1));
    assert_eq!(
        s.pool.try_refund_presale(&presale),
        Err(Ok(Error::RefundTooSmall))
    );
    s.currency.transfer(&presale, &s.pool.address, &1);
    s.pool.refund_presale(&presale);

    assert_eq!(s.pool.withdraw_all(&alice), 960_000);
    assert_eq!(s.pool.withdraw_all(&bob), 960_000);
}

#[test]
fn test_forward_transaction_only_reaches_refund_sender() {
    let s = setup();
    s.contributor(5 * UNIT);
    s.pay_out();

    let sender = Address::generate(&s.env);
    let args = vec![&s.env, s.pool.address.into_val(&s.env)];
    assert!(matches!(
        s.pool
            .try_forward_transaction(&s.creator, &sender, &symbol_short!("withdraw"), &args),
        Err(Ok(Error::InvalidState))
    ));

    s.pool.expect_refund(&s.creator, &sender);
    assert_eq!(s.pool.status(), PoolStatus::Refund);
    let other = Address::generate(&s.env);
    assert!(matches!(
        s.pool.try_forward_transaction(
            &s.creator,
            &other,
            &Symbol::new(&s.env, "withdraw_all"),
            &args
        ),
        Err(Ok(Error::InvalidTarget))
    ));
}

#[test]
fn test_token_received_hook_is_gated() {
    let s = setup();
    let asset = Address::generate(&s.env);
    let from = Address::generate(&s.env);
    assert_eq!(
        s.pool.try_on_token_received(&asset, &from, &10),
        Err(Ok(Error::InvalidState))
    );

    s.contributor(UNIT);
    s.pay_out();
    s.pool.on_token_received(&asset, &from, &10);
}
