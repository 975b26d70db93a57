extern crate std;

use fee_manager::{FeeModel, PerUnitTerms};
use soroban_sdk::{testutils::Address as _, vec, Address, Vec};

use crate::testutils::{build, setup, setup_with, Setup, UNIT};
use crate::{Error, ONE_UNIT};

fn paid_pool_with_recipients() -> (Setup, Vec<Address>) {
    let s = setup_with(|p| {
        let env = p.fee_recipients.env().clone();
        p.fees_per_unit = ONE_UNIT / 100;
        for _ in 0..3 {
            p.fee_recipients.push_back(Address::generate(&env));
        }
    });
    let recipients = s.fee_manager.schedule(&s.pool.address).recipients;

    s.contributor(6 * UNIT);
    s.contributor(4 * UNIT);
    s.pay_out();
    (s, recipients)
}

fn tokens_ready(s: &Setup) {
    let asset = s.token_in_pool(100);
    s.pool.set_token(&s.creator, &asset.address);
}

#[test]
fn test_fee_is_deducted_at_payout() {
    let (s, _) = paid_pool_with_recipients();

    assert_eq!(s.pool.fees_owed(), 1_000_000);
    assert_eq!(s.pool.pool_balance(), 1_000_000);
    let paid = s.pool.get_pool();
    assert_eq!(paid.pool_total, 10 * UNIT);
    assert_eq!(paid.fees_owed, 1_000_000);
}

#[test]
fn test_transfer_fees_moves_owed_fees_once() {
    let (s, _) = paid_pool_with_recipients();
    tokens_ready(&s);

    assert_eq!(s.pool.transfer_fees(), 1_000_000);
    assert_eq!(s.currency.balance(&s.fee_manager.address), 1_000_000);
    assert_eq!(s.pool.fees_owed(), 0);
    assert_eq!(s.fee_manager.team_total(), 250_000);
    assert_eq!(s.fee_manager.schedule(&s.pool.address).recipient_pot, 750_000);
    assert_eq!(
        s.fee_manager.get_fees(&s.pool.address),
        (ONE_UNIT / 400, ONE_UNIT / 100)
    );
    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::NothingToTransfer)));
}

#[test]
fn test_transfer_and_distribute_fees_pays_recipients() {
    let (s, recipients) = paid_pool_with_recipients();
    tokens_ready(&s);

    assert_eq!(s.pool.transfer_and_distribute_fees(), 1_000_000);
    for recipient in recipients.iter() {
        assert_eq!(s.currency.balance(&recipient), 250_000);
    }
}

#[test]
fn test_fees_cannot_move_before_payout() {
    let s = setup_with(|p| p.fees_per_unit = ONE_UNIT / 100);
    s.contributor(UNIT);
    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::InvalidState)));
}

#[test]
fn test_fees_stay_in_pool_until_tokens_arrive() {
    let (s, _) = paid_pool_with_recipients();

    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::InvalidState)));
    assert_eq!(
        s.pool.try_transfer_and_distribute_fees(),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(s.pool.fees_owed(), 1_000_000);
    assert_eq!(s.currency.balance(&s.fee_manager.address), 0);
}

#[test]
fn test_expected_refund_releases_fees() {
    let (s, _) = paid_pool_with_recipients();
    let presale = Address::generate(&s.env);
    s.pool.expect_refund(&s.creator, &presale);

    assert_eq!(s.pool.fees_owed(), 0);
    assert_eq!(s.pool.try_transfer_fees(), Err(Ok(Error::InvalidState)));

    // The held fee is now part of what contributors split.
    let first = s.pool.participant_balances().get(0).unwrap().address;
    assert_eq!(s.pool.withdraw_all(&first), 600_000);
}

#[test]
fn test_fees_do_not_reach_contributors() {
    let (s, _) = paid_pool_with_recipients();
    let asset = s.token_in_pool(100);
    s.pool.set_token(&s.creator, &asset.address);

    let sponsor = Address::generate(&s.env);
    s.fund(&sponsor, 10);
    s.pool.airdrop_currency(&sponsor, &10, &0);

    let first = s.pool.participant_balances().get(0).unwrap().address;
    assert_eq!(s.pool.withdraw_all(&first), 6);
    assert_eq!(s.pool.fees_owed(), 1_000_000);
    assert_eq!(s.pool.transfer_fees(), 1_000_000);
}

#[test]
fn test_half_rate_is_rejected_at_init() {
    let s = setup();
    let id = s.env.register(crate::PresalePool, ());
    let pool = crate::PresalePoolClient::new(&s.env, &id);
    let mut params = crate::testutils::params(&s.env, &s.currency.address, &s.fee_manager.address);
    params.fees_per_unit = ONE_UNIT / 2;

    assert_eq!(pool.try_init(&s.creator, &params), Err(Ok(Error::FeeTooHigh)));
}

#[test]
fn test_creator_is_default_fee_recipient() {
    let s = setup_with(|p| p.fees_per_unit = ONE_UNIT / 100);
    let schedule = s.fee_manager.schedule(&s.pool.address);
    assert_eq!(schedule.recipients, vec![&s.env, s.creator.clone()]);
}

fn per_unit() -> FeeModel {
    FeeModel::PerUnit(PerUnitTerms {
        team_fees_per_unit: ONE_UNIT / 200,
        max_fees_per_unit: ONE_UNIT / 50,
    })
}

#[test]
fn test_discount_lowers_per_unit_rates() {
    let s = build(per_unit(), |p| p.fees_per_unit = ONE_UNIT / 100);
    assert_eq!(s.fee_manager.fee_rate(&s.pool.address), ONE_UNIT * 15 / 1000);

    s.pool
        .discount_fees(&s.creator, &s.team, &(ONE_UNIT / 400), &(ONE_UNIT / 200));
    let schedule = s.fee_manager.schedule(&s.pool.address);
    assert_eq!(schedule.team_rate, ONE_UNIT / 400);
    assert_eq!(schedule.recipients_rate, ONE_UNIT / 200);

    s.contributor(100 * UNIT);
    s.pay_out();
    assert_eq!(s.pool.fees_owed(), 7_500_000);
}

#[test]
fn test_discount_closed_after_payout() {
    let s = build(per_unit(), |p| p.fees_per_unit = ONE_UNIT / 100);
    s.contributor(UNIT);
    s.pay_out();
    assert_eq!(
        s.pool
            .try_discount_fees(&s.creator, &s.team, &0, &0),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_discount_is_creator_only() {
    let s = build(per_unit(), |p| p.fees_per_unit = ONE_UNIT / 100);
    let stranger = Address::generate(&s.env);
    assert_eq!(
        s.pool.try_discount_fees(&stranger, &s.team, &0, &0),
        Err(Ok(Error::NotAuthorized))
    );
}
