#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env};
use vesting_ledger::schedule::{self, VestingSchedule};

const DURATION: u64 = 10_000;

#[derive(Arbitrary, Debug)]
pub struct Grant {
    amount: u32,
    start: u16,
}

#[derive(Arbitrary, Debug)]
pub struct Claim {
    advance: u16,
    start_index: u8,
    count: u8,
}

fuzz_target!(|input: (Vec<Grant>, Vec<Claim>)| {
    let (grants, claims) = input;
    let env = Env::default();
    let beneficiary = Address::generate(&env);

    let mut list = soroban_sdk::Vec::new(&env);
    let mut granted: i128 = 0;
    for grant in grants.iter().filter(|g| g.amount > 0) {
        granted += i128::from(grant.amount);
        list.push_back(VestingSchedule {
            beneficiary: beneficiary.clone(),
            total_vested_amount: i128::from(grant.amount),
            released_amount: 0,
            start_time: u64::from(grant.start),
        });
    }

    let mut now = 0u64;
    let mut released: i128 = 0;
    for claim in claims {
        now += u64::from(claim.advance);
        let start = u32::from(claim.start_index);
        match schedule::settle(&mut list, start, u32::from(claim.count), now, DURATION) {
            Ok(out) => released += out.released,
            Err(_) => assert!(start > list.len()),
        }

        for s in list.iter() {
            assert!(s.released_amount >= 0 && s.released_amount < s.total_vested_amount);
        }
    }

    let owed: i128 = list
        .iter()
        .map(|s| s.total_vested_amount - s.released_amount)
        .sum();
    assert_eq!(released + owed, granted);
});
