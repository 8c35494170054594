use soroban_sdk::{testutils::Ledger as _, Address};

use crate::test::{assert_close, setup, setup_with_duration, PoolFixture, DAY, UNIT, YEAR};
use crate::ContractError;

fn total_effective(f: &PoolFixture, stakers: &[&Address]) -> i128 {
    stakers.iter().map(|s| f.client.effective_balance(s)).sum()
}

// ── Locking ───────────────────────────────────────────────────────────────────

#[test]
fn test_stake_locked_applies_multiplier() {
    let f = setup();
    let staker = f.staker(1_000);

    let id = f.client.stake_locked(&staker, &1_000, &YEAR);

    assert_eq!(id, 1);
    assert_eq!(f.client.effective_balance(&staker), 2_500);
    assert_eq!(f.client.get_reward_state().effective_total_supply, 2_500);

    let info = f.client.get_staker_info(&staker);
    assert_eq!(info.unlocked_balance, 0);
    assert_eq!(info.locked_balance, 1_000);
    assert_eq!(info.effective_balance, 2_500);
    assert_eq!(info.locked_stakes, 1);

    let lock = f.client.locked_stakes(&staker).get_unchecked(0);
    assert_eq!(lock.end_time, YEAR);
    assert_eq!(lock.multiplier, 25_000);
}

#[test]
fn test_stake_locked_rejects_durations_outside_table() {
    let f = setup();
    let staker = f.staker(1_000);

    assert_eq!(
        f.client.try_stake_locked(&staker, &1_000, &DAY),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(
        f.client.try_stake_locked(&staker, &1_000, &(5 * YEAR + 1)),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(
        f.client.try_stake_locked(&staker, &0, &YEAR),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(f.stake_balance(&staker), 1_000);
}

#[test]
fn test_multiplier_view() {
    let f = setup();

    assert_eq!(f.client.multiplier_for(&(7 * DAY)), 10_000);
    assert_eq!(f.client.multiplier_for(&(100 * DAY)), 15_000);
    assert_eq!(f.client.multiplier_for(&(5 * YEAR)), 100_000);
    assert_eq!(
        f.client.try_multiplier_for(&(6 * YEAR)),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_lock_ids_are_never_reused() {
    let f = setup();
    let staker = f.staker(3_000);
    f.client.set_unlocked_stakes(&f.owner, &true);

    let first = f.client.stake_locked(&staker, &1_000, &YEAR);
    f.client.withdraw_locked(&staker, &first, &0, &u32::MAX);
    let second = f.client.stake_locked(&staker, &1_000, &YEAR);

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

// ── Withdrawing locked stakes ─────────────────────────────────────────────────

#[test]
fn test_withdraw_locked_before_end_fails() {
    let f = setup();
    let staker = f.staker(1_000);
    let id = f.client.stake_locked(&staker, &1_000, &YEAR);

    f.env.ledger().set_timestamp(YEAR - 1);
    let result = f.client.try_withdraw_locked(&staker, &id, &0, &u32::MAX);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Locked),
        _ => unreachable!("Expected Locked error"),
    }
    assert_eq!(f.client.locked_stakes_count(&staker), 1);
}

#[test]
fn test_withdraw_locked_after_end() {
    let f = setup();
    let staker = f.staker(1_000);
    let id = f.client.stake_locked(&staker, &1_000, &YEAR);

    f.env.ledger().set_timestamp(YEAR);
    let paid = f.client.withdraw_locked(&staker, &id, &0, &u32::MAX);

    assert_eq!(paid, 1_000);
    assert_eq!(f.stake_balance(&staker), 1_000);
    assert_eq!(f.client.locked_stakes_count(&staker), 0);
    assert_eq!(f.client.effective_balance(&staker), 0);
    assert_eq!(f.client.get_reward_state().effective_total_supply, 0);
}

#[test]
fn test_emergency_unlock_allows_early_exit() {
    let f = setup();
    let staker = f.staker(1_000);
    let id = f.client.stake_locked(&staker, &1_000, &(5 * YEAR));

    f.env.ledger().set_timestamp(DAY);
    f.client.set_unlocked_stakes(&f.owner, &true);
    assert!(f.client.unlocked_stakes());

    let paid = f.client.withdraw_locked(&staker, &id, &0, &u32::MAX);
    assert_eq!(paid, 1_000);
    assert_eq!(f.stake_balance(&staker), 1_000);
}

#[test]
fn test_withdraw_locked_range_search() {
    let f = setup();
    let staker = f.staker(3_000);
    f.client.stake_locked(&staker, &1_000, &YEAR);
    f.client.stake_locked(&staker, &1_000, &YEAR);
    let third = f.client.stake_locked(&staker, &1_000, &YEAR);
    f.env.ledger().set_timestamp(YEAR);

    assert_eq!(
        f.client.try_withdraw_locked(&staker, &third, &0, &2),
        Err(Ok(ContractError::StakeNotFound))
    );
    assert_eq!(
        f.client.try_withdraw_locked(&staker, &third, &4, &9),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(
        f.client.try_withdraw_locked(&staker, &99, &0, &u32::MAX),
        Err(Ok(ContractError::StakeNotFound))
    );

    f.client.withdraw_locked(&staker, &third, &2, &3);

    // Remaining stakes keep their order.
    let remaining = f.client.locked_stakes(&staker);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining.get_unchecked(0).id, 1);
    assert_eq!(remaining.get_unchecked(1).id, 2);
}

// ── Rewards with multipliers ─────────────────────────────────────────────────

#[test]
fn test_locked_stake_earns_weighted_share() {
    let f = setup();
    let yearly = 21_000_000 * UNIT / 5;

    let alice = f.staker(2 * UNIT);
    let bob = f.staker(6 * UNIT);
    f.client.stake_locked(&alice, &(2 * UNIT), &(5 * YEAR));
    f.client.stake(&bob, &(6 * UNIT));
    assert_eq!(f.client.effective_balance(&alice), 20 * UNIT);

    f.fund(yearly);
    f.client.renew_if_applicable();
    let rate = f.client.get_reward_state().reward_rate;

    let elapsed = 360 * DAY;
    f.env.ledger().set_timestamp(elapsed);

    let expected_alice = rate * elapsed as i128 * 20 / 26;
    let expected_bob = rate * elapsed as i128 * 6 / 26;
    assert_close(f.client.earned(&alice), expected_alice, UNIT);
    assert_close(f.client.earned(&bob), expected_bob, UNIT);
}

#[test]
fn test_rewards_accrued_while_locked_survive_withdrawal() {
    let f = setup_with_duration(1_000);
    let staker = f.staker(1_000);
    let id = f.client.stake_locked(&staker, &1_000, &(7 * DAY));
    f.fund(10_000);
    f.client.renew_if_applicable();

    f.env.ledger().set_timestamp(7 * DAY);
    f.client.withdraw_locked(&staker, &id, &0, &u32::MAX);

    assert_eq!(f.client.earned(&staker), 10_000);
    assert_eq!(f.client.get_reward(&staker), 10_000);
}

#[test]
fn test_effective_supply_matches_sum_of_positions() {
    let f = setup();
    let alice = f.staker(10_000);
    let bob = f.staker(10_000);
    let carol = f.staker(10_000);

    f.client.stake(&alice, &1_000);
    let a_lock = f.client.stake_locked(&alice, &2_000, &(2 * YEAR));
    f.client.stake_locked(&bob, &3_000, &(90 * DAY));
    f.client.stake(&carol, &4_000);
    f.client.stake_locked(&carol, &500, &(5 * YEAR));

    let stakers = [&alice, &bob, &carol];
    assert_eq!(
        f.client.get_reward_state().effective_total_supply,
        total_effective(&f, &stakers)
    );

    f.env.ledger().set_timestamp(2 * YEAR);
    f.client.withdraw_locked(&alice, &a_lock, &0, &u32::MAX);
    f.client.withdraw(&carol, &1_500);

    assert_eq!(
        f.client.get_reward_state().effective_total_supply,
        total_effective(&f, &stakers)
    );
    assert_eq!(f.client.effective_balance(&alice), 1_000);
}
