extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::testutils::{setup, Setup};
use crate::{Error, Failure};

/// Two contributors of 5 and 6, paid out, with `tokens` of a fresh asset
/// confirmed in the pool.
fn ready(a: i128, b: i128, tokens: i128) -> (Setup, Address, Address, Address) {
    let s = setup();
    let alice = s.contributor(a);
    let bob = s.contributor(b);
    s.pay_out();
    let asset = s.token_in_pool(tokens);
    s.pool.confirm_tokens(&s.creator, &asset.address, &false);
    (s, alice, bob, asset.address)
}

#[test]
fn test_tokens_split_pro_rata_rounded_down() {
    let (s, alice, bob, asset) = ready(5, 6, 60);
    let token = soroban_sdk::token::Client::new(&s.env, &asset);

    assert_eq!(s.pool.transfer_tokens_to_all(&asset), 59);
    assert_eq!(token.balance(&alice), 27);
    assert_eq!(token.balance(&bob), 32);
    assert_eq!(token.balance(&s.pool.address), 1);
}

#[test]
fn test_top_up_pays_only_the_new_layer() {
    let (s, alice, bob, asset) = ready(5, 6, 60);
    let token = soroban_sdk::token::Client::new(&s.env, &asset);
    s.pool.transfer_tokens_to_all(&asset);

    s.mint_token(&asset, 11);
    assert_eq!(s.pool.transfer_tokens_to_all(&asset), 11);
    assert_eq!(token.balance(&alice), 32);
    assert_eq!(token.balance(&bob), 38);
    assert_eq!(s.pool.claimed(&asset, &alice), 32);
}

#[test]
fn test_two_to_one_split_with_top_up() {
    let (s, alice, bob, asset) = ready(2, 1, 60);
    let token = soroban_sdk::token::Client::new(&s.env, &asset);

    s.pool.transfer_tokens_to_all(&asset);
    assert_eq!((token.balance(&alice), token.balance(&bob)), (40, 20));

    s.mint_token(&asset, 18);
    s.pool.transfer_tokens_to_all(&asset);
    assert_eq!((token.balance(&alice), token.balance(&bob)), (52, 26));
}

#[test]
fn test_repeated_distribution_pays_nothing() {
    let (s, _, _, asset) = ready(5, 6, 60);
    s.pool.transfer_tokens_to_all(&asset);
    assert_eq!(s.pool.transfer_tokens_to_all(&asset), 0);
}

#[test]
fn test_duplicate_recipients_are_paid_once() {
    let (s, alice, bob, asset) = ready(5, 6, 60);
    let stranger = Address::generate(&s.env);

    let paid = s.pool.transfer_tokens_to(
        &asset,
        &vec![&s.env, alice.clone(), alice.clone(), stranger, bob.clone()],
    );
    assert_eq!(paid, 59);
    assert_eq!(s.pool.claimed(&asset, &alice), 27);
}

#[test]
fn test_range_pages_through_participants() {
    let s = setup();
    let a = s.contributor(1);
    let b = s.contributor(1);
    let c = s.contributor(1);
    s.pay_out();
    let asset = s.token_in_pool(30);
    s.pool.set_token(&s.creator, &asset.address);

    assert_eq!(s.pool.transfer_tokens_to_range(&asset.address, &0, &2), 20);
    assert_eq!(asset.balance(&c), 0);
    assert_eq!(s.pool.transfer_tokens_to_range(&asset.address, &2, &5), 10);
    assert_eq!((asset.balance(&a), asset.balance(&b), asset.balance(&c)), (10, 10, 10));
}

#[test]
fn test_transfer_my_tokens() {
    let (s, alice, _, asset) = ready(5, 6, 60);
    assert_eq!(s.pool.transfer_my_tokens(&alice), 27);
    assert_eq!(s.pool.transfer_my_tokens(&alice), 0);
    assert_eq!(s.pool.transfer_my_tokens(&Address::generate(&s.env)), 0);
    assert_eq!(s.pool.claimed(&asset, &alice), 27);
}

#[test]
fn test_distribution_requires_confirmed_token() {
    let s = setup();
    let alice = s.contributor(5);
    let asset = s.token_in_pool(60);

    assert_eq!(
        s.pool.try_transfer_tokens_to_all(&asset.address),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(
        s.pool.try_transfer_my_tokens(&alice),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_currency_is_not_distributed_as_token() {
    let (s, _, _, _) = ready(5, 6, 60);
    assert_eq!(
        s.pool.try_transfer_tokens_to_all(&s.currency.address),
        Err(Ok(Error::InvalidToken))
    );
}

#[test]
fn test_rejected_payout_is_logged_and_retried() {
    let s = setup();
    let alice = s.contributor(5);
    let bob = s.contributor(6);
    s.pay_out();

    let mock = s.mock_token();
    mock.mint(&s.pool.address, &60);
    s.pool.confirm_tokens(&s.creator, &mock.address, &false);
    mock.block(&alice);

    assert_eq!(s.pool.transfer_tokens_to_all(&mock.address), 32);
    assert_eq!(mock.balance(&bob), 32);
    assert_eq!(mock.balance(&alice), 0);
    assert_eq!(s.pool.claimed(&mock.address, &alice), 0);
    assert_eq!(s.pool.failure_count(), 1);
    assert_eq!(
        s.pool.failures(&0, &10).get(0).unwrap(),
        Failure {
            participant: alice.clone(),
            asset: mock.address.clone(),
            amount: 27,
        }
    );

    mock.unblock(&alice);
    assert_eq!(
        s.pool.transfer_tokens_to(&mock.address, &vec![&s.env, alice.clone()]),
        27
    );
    assert_eq!(mock.balance(&alice), 27);
    assert_eq!(mock.balance(&s.pool.address), 1);
}

#[test]
fn test_rejected_self_claim_fails_loudly() {
    let s = setup();
    let alice = s.contributor(5);
    s.pay_out();

    let mock = s.mock_token();
    mock.mint(&s.pool.address, &60);
    s.pool.confirm_tokens(&s.creator, &mock.address, &false);
    mock.block(&alice);

    assert_eq!(
        s.pool.try_transfer_my_tokens(&alice),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(s.pool.failure_count(), 0);
}

#[test]
fn test_currency_airdrop_is_withdrawable_pro_rata() {
    let (s, alice, bob, _) = ready(5, 6, 60);
    let sponsor = Address::generate(&s.env);
    s.fund(&sponsor, 110);

    assert_eq!(s.pool.airdrop_currency(&sponsor, &110, &0), 110);
    assert_eq!(s.pool.withdraw_all(&alice), 50);
    assert_eq!(s.pool.withdraw_all(&bob), 60);
    assert_eq!(s.pool.pool_balance(), 0);
}

#[test]
fn test_withdraw_all_for_many_pays_each_owner() {
    let (s, alice, bob, _) = ready(5, 6, 60);
    let sponsor = Address::generate(&s.env);
    s.fund(&sponsor, 110);
    s.pool.airdrop_currency(&sponsor, &110, &0);

    let paid = s
        .pool
        .withdraw_all_for_many(&vec![&s.env, alice.clone(), bob.clone(), sponsor]);
    assert_eq!(paid, 110);
    assert_eq!(s.currency.balance(&alice), 50);
    assert_eq!(s.currency.balance(&bob), 60);
    assert_eq!(s.pool.withdraw_all_for_many(&vec![&s.env, alice]), 0);
}

#[test]
fn test_withdraw_all_for_many_needs_settled_pool() {
    let s = setup();
    let alice = s.contributor(5);
    assert_eq!(
        s.pool.try_withdraw_all_for_many(&vec![&s.env, alice]),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_token_airdrop_is_announced() {
    let (s, alice, _, asset) = ready(5, 6, 60);
    let sponsor = Address::generate(&s.env);

    s.mint_token(&asset, 22);
    assert_eq!(s.pool.airdrop_tokens(&sponsor, &asset, &0), 82);
    s.pool.transfer_tokens_to_all(&asset);
    assert_eq!(
        soroban_sdk::token::Client::new(&s.env, &asset).balance(&alice),
        37
    );

    assert_eq!(
        s.pool.try_airdrop_tokens(&sponsor, &s.currency.address, &0),
        Err(Ok(Error::InvalidToken))
    );
}
