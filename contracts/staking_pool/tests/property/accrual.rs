#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Properties of the pure reward-per-share arithmetic.

use proptest::prelude::*;
use staking_pool::rewards::{self, RewardState, UserPosition};

fn active(rate: i128, supply: i128, finish: u64) -> RewardState {
    RewardState {
        reward_per_share_stored: 0,
        last_update_time: 0,
        period_finish: finish,
        reward_rate: rate,
        effective_total_supply: supply,
        reward_budget: 0,
    }
}

proptest! {
    /// Reward-per-share never decreases, whatever the checkpoint cadence.
    #[test]
    fn prop_rps_monotonic(
        rate in 0i128..1_000_000,
        supply in 1i128..1_000_000_000,
        steps in proptest::collection::vec(0u64..10_000, 1..30),
    ) {
        let mut state = active(rate, supply, 100_000);
        let mut now = 0u64;
        let mut prev = 0i128;
        for dt in steps {
            now += dt;
            rewards::accrue(&mut state, now);
            prop_assert!(state.reward_per_share_stored >= prev);
            prev = state.reward_per_share_stored;
        }
    }

    /// Nothing accrues past `period_finish`.
    #[test]
    fn prop_accrual_capped_at_period_finish(
        rate in 1i128..1_000_000,
        supply in 1i128..1_000_000,
        finish in 1u64..100_000,
        overshoot in 1u64..1_000_000,
    ) {
        let mut at_finish = active(rate, supply, finish);
        rewards::accrue(&mut at_finish, finish);

        let mut late = active(rate, supply, finish);
        rewards::accrue(&mut late, finish + overshoot);

        prop_assert_eq!(at_finish.reward_per_share_stored, late.reward_per_share_stored);
    }

    /// Stakers sharing a pool are never paid more than the pool emitted.
    #[test]
    fn prop_shares_never_exceed_emission(
        rate in 1i128..1_000_000,
        balances in proptest::collection::vec(1i128..1_000_000, 1..8),
        elapsed in 1u64..10_000,
    ) {
        let supply: i128 = balances.iter().sum();
        let mut state = active(rate, supply, 10_000);
        rewards::accrue(&mut state, elapsed);

        let paid: i128 = balances
            .iter()
            .map(|b| {
                let mut pos = UserPosition::default();
                rewards::checkpoint_user(&state, &mut pos, *b);
                pos.rewards_earned
            })
            .sum();

        prop_assert!(paid <= rate * elapsed as i128);
    }

    /// Folding funds into a running period never loses tokens: the new rate
    /// over the time left plus the banked remainder equals leftover + amount.
    #[test]
    fn prop_fold_funds_conserves_tokens(
        rate in 0i128..1_000_000,
        finish in 2u64..100_000,
        amount in 1i128..1_000_000_000,
        now_frac in 0u64..100,
    ) {
        let now = finish * now_frac / 100;
        let mut state = active(rate, 1, finish);
        let remaining = (finish - now) as i128;
        let before = rate * remaining;

        rewards::fold_funds(&mut state, amount, now).unwrap();

        prop_assert_eq!(state.reward_rate * remaining + state.reward_budget, before + amount);
    }
}
