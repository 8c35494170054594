#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Registry invariants under random registration, repair, paged collection,
//! and vesting pulls.
//!
//! - `weights_total` always equals the sum of registered weights
//! - the distributor never pays out more than it was funded with
//! - its balance is exactly budget + pool reserve + pending vesting + allowance
//! - pools are never owed more than the tokens not earmarked for vesting

use common::EmissionCurve;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use reward_distributor::{RewardDistributor, RewardDistributorClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

const FUNDED: i128 = 1_000_000_000_000;

/// Accepts any funding notification.
#[contract]
pub struct SinkPool;

#[contractimpl]
impl SinkPool {
    pub fn notify_funded(_env: Env, _amount: i128) {}
}

#[derive(Clone, Debug, Arbitrary)]
enum Action {
    Register {
        #[proptest(strategy = "proptest::collection::vec((0usize..6, 0u64..100), 1..4)")]
        batch: std::vec::Vec<(usize, u64)>,
    },
    Repair {
        #[proptest(strategy = "0u32..6")]
        i: u32,
        #[proptest(strategy = "0u32..6")]
        j: u32,
    },
    Collect {
        #[proptest(strategy = "0u32..7")]
        start: u32,
        #[proptest(strategy = "0u32..7")]
        end: u32,
    },
    Pull {
        #[proptest(strategy = "1i128..1_000_000_000")]
        amount: i128,
    },
    Advance {
        #[proptest(strategy = "1u64..100_000")]
        secs: u64,
    },
}

struct Harness {
    env: Env,
    client: RewardDistributorClient<'static>,
    owner: Address,
    token: Address,
    ledger: Address,
    candidates: std::vec::Vec<Address>,
}

fn setup() -> Harness {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let client = RewardDistributorClient::new(&env, &env.register(RewardDistributor, ()));
    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &token,
        &EmissionCurve {
            total_supply: 10 * FUNDED,
            initial_bps: 1_000,
            decay_bps: 8_000,
            period_seconds: 86_400,
            max_periods: 20,
        },
        &10,
    );

    let funder = Address::generate(&env);
    StellarAssetClient::new(&env, &token).mint(&funder, &FUNDED);
    client.fund(&funder, &FUNDED);

    let ledger = Address::generate(&env);
    client.set_vesting_ledger(&owner, &ledger);

    let candidates = (0..6).map(|_| env.register(SinkPool, ())).collect();
    Harness { env, client, owner, token, ledger, candidates }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_registry_stays_solvent(actions in proptest::collection::vec(any::<Action>(), 1..25)) {
        let Harness { env, client, owner, token, ledger, candidates } = setup();
        let tokens = TokenClient::new(&env, &token);
        let mut paid_out = 0i128;

        for action in &actions {
            match action {
                Action::Register { batch } => {
                    let mut ids = Vec::new(&env);
                    let mut weights = Vec::new(&env);
                    for (pick, weight) in batch {
                        ids.push_back(candidates[*pick].clone());
                        weights.push_back(*weight);
                    }
                    // Batches naming a pool twice are rejected whole.
                    let _ = client.try_register_pools(&owner, &ids, &weights);
                }
                Action::Repair { i, j } => {
                    let _ = client.try_remove_duplicate_pool(&owner, i, j);
                }
                Action::Collect { start, end } => {
                    let len = client.pool_count();
                    let start = (*start).min(len);
                    let end = (*end).min(len).max(start);
                    paid_out += client.collect_all_rewards(&start, &end);
                }
                Action::Pull { amount } => {
                    let amount = (*amount).min(tokens.allowance(&client.address, &ledger));
                    if amount > 0 {
                        tokens.transfer_from(&ledger, &client.address, &ledger, &amount);
                        paid_out += amount;
                    }
                }
                Action::Advance { secs } => {
                    let now = env.ledger().timestamp();
                    env.ledger().set_timestamp(now + secs);
                }
            }

            let sum: u64 = client.pools().iter().map(|e| e.weight).sum();
            prop_assert_eq!(client.weights_total(), sum);

            let balance = tokens.balance(&client.address);
            let allowance = tokens.allowance(&client.address, &ledger);
            let state = client.get_state();
            prop_assert_eq!(balance, FUNDED - paid_out);
            prop_assert_eq!(
                balance,
                state.budget + state.pools_reserve + state.vesting_pending + allowance
            );

            let owed: i128 = (0..client.pool_count())
                .map(|i| client.pending_for_pool(&i))
                .sum();
            prop_assert!(owed <= balance - allowance - client.pending_vesting());
        }
    }
}
