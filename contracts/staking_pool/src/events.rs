#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub distributor: Address,
    pub rewards_duration: u64,
    pub timestamp: u64,
}

/// Fired when a staker deposits into the unlocked balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub effective_total_supply: i128,
    pub timestamp: u64,
}

/// Fired when a staker withdraws from the unlocked balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub effective_total_supply: i128,
    pub timestamp: u64,
}

/// Fired when a staker opens a time-locked stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedStakedEvent {
    pub staker: Address,
    pub stake_id: u64,
    pub amount: i128,
    pub multiplier: u32,
    pub end_time: u64,
    pub timestamp: u64,
}

/// Fired when a time-locked stake is withdrawn.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedWithdrawnEvent {
    pub staker: Address,
    pub stake_id: u64,
    pub amount: i128,
    pub early: bool,
    pub timestamp: u64,
}

/// Fired when a staker collects accrued rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when the distributor pushes new funds into the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub amount: i128,
    pub reward_rate: i128,
    pub reward_budget: i128,
    pub timestamp: u64,
}

/// Fired when a new reward period starts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodRenewedEvent {
    pub reward_rate: i128,
    pub period_finish: u64,
    pub timestamp: u64,
}

/// Fired when the emergency unlock flag changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnlockedStakesSetEvent {
    pub caller: Address,
    pub unlocked: bool,
    pub timestamp: u64,
}

/// Fired when the owner changes the length of future periods.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDurationSetEvent {
    pub rewards_duration: u64,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    stake_token: Address,
    reward_token: Address,
    distributor: Address,
    rewards_duration: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token,
            reward_token,
            distributor,
            rewards_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, effective_total_supply: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            effective_total_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, effective_total_supply: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            effective_total_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_locked_staked(
    env: &Env,
    staker: Address,
    stake_id: u64,
    amount: i128,
    multiplier: u32,
    end_time: u64,
) {
    env.events().publish(
        (symbol_short!("LCK_STAKE"), staker.clone()),
        LockedStakedEvent {
            staker,
            stake_id,
            amount,
            multiplier,
            end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_locked_withdrawn(env: &Env, staker: Address, stake_id: u64, amount: i128, early: bool) {
    env.events().publish(
        (symbol_short!("LCK_WDRAW"), staker.clone()),
        LockedWithdrawnEvent {
            staker,
            stake_id,
            amount,
            early,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funded(env: &Env, amount: i128, reward_rate: i128, reward_budget: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"),),
        FundedEvent {
            amount,
            reward_rate,
            reward_budget,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_period_renewed(env: &Env, reward_rate: i128, period_finish: u64) {
    env.events().publish(
        (symbol_short!("RENEWED"),),
        PeriodRenewedEvent {
            reward_rate,
            period_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unlocked_stakes_set(env: &Env, caller: Address, unlocked: bool) {
    env.events().publish(
        (symbol_short!("UNLK_SET"), caller.clone()),
        UnlockedStakesSetEvent {
            caller,
            unlocked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_duration_set(env: &Env, rewards_duration: u64) {
    env.events().publish(
        (symbol_short!("DUR_SET"),),
        RewardsDurationSetEvent {
            rewards_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}
