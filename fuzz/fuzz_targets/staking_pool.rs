#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    vec, Address, Env,
};
use staking_pool::{locks::MultiplierTier, StakingPool, StakingPoolClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u32 },
    Withdraw { amount: u32 },
    StakeLocked { amount: u32, lock_secs: u32 },
    WithdrawLocked { stake_id: u8, range_start: u8, range_end: u8 },
    GetReward,
    Fund { amount: u32 },
    Renew,
    Advance { secs: u16 },
    EmergencyUnlock { on: bool },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let distributor = Address::generate(&env);
    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let client = StakingPoolClient::new(&env, &env.register(StakingPool, ()));
    let tiers = vec![
        &env,
        MultiplierTier { min_lock_secs: 60, multiplier: 10_000 },
        MultiplierTier { min_lock_secs: 3_600, multiplier: 30_000 },
        MultiplierTier { min_lock_secs: 86_400, multiplier: 100_000 },
    ];
    client.initialize(&owner, &stake_token, &reward_token, &distributor, &600, &tiers);

    let mut users = vec![&env];
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &(i128::from(u32::MAX) * 64));
        users.push_back(user);
    }

    let mut funded: i128 = 0;
    let mut claimed: i128 = 0;

    for (i, action) in actions.into_iter().enumerate() {
        let caller = users.get_unchecked(i as u32 % users.len());
        match action {
            FuzzAction::Stake { amount } => {
                let _ = client.try_stake(&caller, &i128::from(amount));
            }
            FuzzAction::Withdraw { amount } => {
                let _ = client.try_withdraw(&caller, &i128::from(amount));
            }
            FuzzAction::StakeLocked { amount, lock_secs } => {
                let _ = client.try_stake_locked(&caller, &i128::from(amount), &u64::from(lock_secs));
            }
            FuzzAction::WithdrawLocked { stake_id, range_start, range_end } => {
                let _ = client.try_withdraw_locked(
                    &caller,
                    &u64::from(stake_id),
                    &u32::from(range_start),
                    &u32::from(range_end),
                );
            }
            FuzzAction::GetReward => {
                if let Ok(Ok(paid)) = client.try_get_reward(&caller) {
                    claimed += paid;
                }
            }
            FuzzAction::Fund { amount } => {
                let amount = i128::from(amount);
                StellarAssetClient::new(&env, &reward_token).mint(&client.address, &amount);
                if let Ok(Ok(())) = client.try_notify_funded(&amount) {
                    funded += amount;
                }
            }
            FuzzAction::Renew => {
                let _ = client.try_renew_if_applicable();
            }
            FuzzAction::Advance { secs } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(secs));
            }
            FuzzAction::EmergencyUnlock { on } => {
                let _ = client.try_set_unlocked_stakes(&owner, &on);
            }
        }

        let state = client.get_reward_state();
        let effective: i128 = users.iter().map(|u| client.effective_balance(&u)).sum();
        assert_eq!(state.effective_total_supply, effective);
        assert!(claimed <= funded);
    }
});
