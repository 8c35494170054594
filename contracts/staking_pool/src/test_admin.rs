use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{setup, DAY, YEAR};
use crate::ContractError;

// ── Owner and emergency executor ──────────────────────────────────────────────

#[test]
fn test_owner_appoints_emergency_executor() {
    let f = setup();
    let executor = Address::generate(&f.env);

    assert_eq!(f.client.get_emergency_executor(), None);
    f.client.set_emergency_executor(&f.owner, &executor);
    assert_eq!(f.client.get_emergency_executor(), Some(executor));
}

#[test]
fn test_executor_cannot_appoint_executor() {
    let f = setup();
    let executor = Address::generate(&f.env);
    f.client.set_emergency_executor(&f.owner, &executor);

    let other = Address::generate(&f.env);
    let result = f.client.try_set_emergency_executor(&executor, &other);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_executor_can_pause_and_unlock() {
    let f = setup();
    let executor = Address::generate(&f.env);
    f.client.set_emergency_executor(&f.owner, &executor);

    f.client.set_paused(&executor, &true);
    assert!(f.client.is_paused());
    f.client.set_paused(&executor, &false);
    assert!(!f.client.is_paused());

    f.client.set_unlocked_stakes(&executor, &true);
    assert!(f.client.unlocked_stakes());
}

#[test]
fn test_stranger_cannot_flip_switches() {
    let f = setup();
    let stranger = Address::generate(&f.env);

    assert_eq!(
        f.client.try_set_paused(&stranger, &true),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        f.client.try_set_unlocked_stakes(&stranger, &true),
        Err(Ok(ContractError::Unauthorized))
    );
    assert!(!f.client.is_paused());
    assert!(!f.client.unlocked_stakes());
}

// ── Rewards duration ─────────────────────────────────────────────────────────

#[test]
fn test_set_rewards_duration_applies_to_next_period() {
    let f = setup();
    f.client.set_rewards_duration(&f.owner, &(30 * DAY));
    assert_eq!(f.client.get_config().rewards_duration, 30 * DAY);

    f.fund(30 * DAY as i128 * 100);
    f.client.renew_if_applicable();
    let state = f.client.get_reward_state();
    assert_eq!(state.period_finish, 30 * DAY);
    assert_eq!(state.reward_rate, 100);
}

#[test]
fn test_set_rewards_duration_guards() {
    let f = setup();
    let executor = Address::generate(&f.env);
    f.client.set_emergency_executor(&f.owner, &executor);

    assert_eq!(
        f.client.try_set_rewards_duration(&executor, &DAY),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        f.client.try_set_rewards_duration(&f.owner, &0),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(f.client.get_config().rewards_duration, YEAR);
}

// ── Ownership transfer ───────────────────────────────────────────────────────

#[test]
fn test_two_step_ownership_transfer() {
    let f = setup();
    let next = Address::generate(&f.env);

    f.client.propose_owner(&f.owner, &next);
    assert_eq!(f.client.get_pending_owner(), Some(next.clone()));
    assert_eq!(f.client.get_owner(), f.owner);

    f.client.accept_owner(&next);
    assert_eq!(f.client.get_owner(), next);
    assert_eq!(f.client.get_pending_owner(), None);

    // The previous owner lost its powers.
    assert_eq!(
        f.client.try_set_paused(&f.owner, &true),
        Err(Ok(ContractError::Unauthorized))
    );
    f.client.set_paused(&next, &true);
    assert!(f.client.is_paused());
}

#[test]
fn test_accept_owner_requires_nomination() {
    let f = setup();
    let next = Address::generate(&f.env);
    let impostor = Address::generate(&f.env);

    assert_eq!(
        f.client.try_accept_owner(&next),
        Err(Ok(ContractError::NoPendingOwner))
    );

    f.client.propose_owner(&f.owner, &next);
    assert_eq!(
        f.client.try_accept_owner(&impostor),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_cancel_owner_transfer() {
    let f = setup();
    let next = Address::generate(&f.env);

    f.client.propose_owner(&f.owner, &next);
    f.client.cancel_owner_transfer(&f.owner);

    assert_eq!(f.client.get_pending_owner(), None);
    assert_eq!(
        f.client.try_accept_owner(&next),
        Err(Ok(ContractError::NoPendingOwner))
    );
    assert_eq!(
        f.client.try_cancel_owner_transfer(&f.owner),
        Err(Ok(ContractError::NoPendingOwner))
    );
}

#[test]
fn test_only_owner_can_propose() {
    let f = setup();
    let stranger = Address::generate(&f.env);

    assert_eq!(
        f.client.try_propose_owner(&stranger, &stranger),
        Err(Ok(ContractError::Unauthorized))
    );
}
