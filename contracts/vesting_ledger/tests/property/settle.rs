#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Invariants of the compacting claim walk.
//!
//! - `0 <= released <= total` for every live schedule
//! - a schedule disappears only once fully released
//! - the sum released over any claim sequence never exceeds what was granted

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env, Vec};
use vesting_ledger::schedule::{self, VestingSchedule};

const DURATION: u64 = 1_000;

fn build(env: &Env, grants: &[(i128, u64)]) -> Vec<VestingSchedule> {
    let who = Address::generate(env);
    let mut list = Vec::new(env);
    for (total, start) in grants {
        list.push_back(VestingSchedule {
            beneficiary: who.clone(),
            total_vested_amount: *total,
            released_amount: 0,
            start_time: *start,
        });
    }
    list
}

proptest! {
    #[test]
    fn prop_release_bounded_by_grants(
        grants in proptest::collection::vec((1i128..1_000_000, 0u64..5_000), 1..12),
        claims in proptest::collection::vec((0u64..800, 0u32..4, 1u32..6), 1..20),
    ) {
        let env = Env::default();
        let mut list = build(&env, &grants);
        let granted: i128 = grants.iter().map(|(t, _)| *t).sum();

        let mut now = 0u64;
        let mut released = 0i128;
        for (dt, start, count) in claims {
            now += dt;
            let start = start.min(list.len());
            let out = schedule::settle(&mut list, start, count, now, DURATION).unwrap();
            released += out.released;

            for s in list.iter() {
                prop_assert!(s.released_amount >= 0);
                prop_assert!(s.released_amount < s.total_vested_amount);
            }
        }

        let still_owed: i128 = list
            .iter()
            .map(|s| s.total_vested_amount - s.released_amount)
            .sum();
        prop_assert!(released <= granted);
        prop_assert_eq!(released + still_owed, granted);
    }

    /// A full sweep long after every start time releases everything and
    /// leaves the list empty.
    #[test]
    fn prop_full_sweep_drains(
        grants in proptest::collection::vec((1i128..1_000_000, 0u64..5_000), 1..12),
    ) {
        let env = Env::default();
        let mut list = build(&env, &grants);
        let granted: i128 = grants.iter().map(|(t, _)| *t).sum();

        let out = schedule::settle(&mut list, 0, u32::MAX, 10_000, DURATION).unwrap();

        prop_assert_eq!(out.released, granted);
        prop_assert_eq!(list.len(), 0);
    }
}
