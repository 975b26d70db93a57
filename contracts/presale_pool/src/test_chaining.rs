extern crate std;

use soroban_sdk::{symbol_short, testutils::Address as _, vec, Address, IntoVal, Symbol};

use crate::testutils::{setup_with, Setup, UNIT};
use crate::{Error, PoolStatus, PresalePoolClient, ONE_UNIT};

/// Pool A charges 0.5% and holds 10 + 20 units; pool B is fee-free.
fn chained() -> (Setup, PresalePoolClient<'static>, Address, Address) {
    let s = setup_with(|p| p.fees_per_unit = ONE_UNIT / 200);
    let upstream = s.other_pool(|_| {});
    let alice = s.contributor(UNIT);
    let bob = s.contributor(2 * UNIT);
    (s, upstream, alice, bob)
}

fn pay_into(s: &Setup, upstream: &PresalePoolClient<'static>) -> i128 {
    s.pool.pay_to_presale(
        &s.creator,
        &upstream.address,
        &0,
        &0,
        &Some(symbol_short!("deposit")),
        &0,
    )
}

#[test]
fn test_pool_deposits_into_another_pool() {
    let (s, upstream, _, _) = chained();

    assert_eq!(pay_into(&s, &upstream), 29_850_000);
    let entry = upstream.participant(&s.pool.address);
    assert_eq!(entry.contribution, 29_850_000);
    assert_eq!(upstream.pool_total(), 29_850_000);
    assert_eq!(s.pool.pool_balance(), 150_000);
    assert_eq!(s.pool.fees_owed(), 150_000);
}

#[test]
fn test_rejected_callback_aborts_payout() {
    let (s, upstream, _, _) = chained();
    upstream.close(&s.creator);

    // A closed pool rejects the deposit, so the callback itself fails.
    assert!(s
        .pool
        .try_pay_to_presale(
            &s.creator,
            &upstream.address,
            &0,
            &0,
            &Some(symbol_short!("deposit")),
            &0,
        )
        .is_err());
    assert_eq!(s.pool.status(), PoolStatus::Open);
}

#[test]
fn test_cancelled_upstream_refunds_through_downstream() {
    let (s, upstream, alice, bob) = chained();
    pay_into(&s, &upstream);

    s.pool.expect_refund(&s.creator, &upstream.address);
    upstream.fail(&s.creator, &0);

    let args = vec![&s.env, s.pool.address.into_val(&s.env)];
    s.pool.forward_transaction(
        &s.creator,
        &upstream.address,
        &Symbol::new(&s.env, "withdraw_all"),
        &args,
    );
    assert_eq!(s.pool.pool_balance(), 30_000_000);
    assert_eq!(upstream.pool_balance(), 0);

    let paid = s
        .pool
        .withdraw_all_for_many(&vec![&s.env, alice.clone(), bob.clone()]);
    assert_eq!(paid, 30_000_000);
    assert_eq!(s.currency.balance(&alice), 10_000_000);
    assert_eq!(s.currency.balance(&bob), 20_000_000);

    // Expecting a refund released the held fee.
    assert_eq!(s.pool.fees_owed(), 0);
    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::InvalidState)));
    assert_eq!(s.pool.pool_balance(), 0);
}

#[test]
fn test_upstream_payout_reaches_presale() {
    let (s, upstream, _, _) = chained();
    pay_into(&s, &upstream);

    let presale = Address::generate(&s.env);
    upstream.pay_to_presale(&s.creator, &presale, &0, &0, &None, &0);
    assert_eq!(s.currency.balance(&presale), 29_850_000);
    assert_eq!(upstream.status(), PoolStatus::Paid);
}
