#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_token: Address,
    pub vesting_ratio_pct: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub from: Address,
    pub amount: i128,
    pub budget: i128,
    pub timestamp: u64,
}

/// Fired for every entry a registration batch adds or updates.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRegisteredEvent {
    pub pool: Address,
    pub index: u32,
    pub weight: u64,
    pub weights_total: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsCollectedEvent {
    pub pool: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingFundedEvent {
    pub ledger: Address,
    pub amount: i128,
    pub allowance: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRemovedEvent {
    pub index: u32,
    pub source: u32,
    pub returned_to_budget: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolPausedEvent {
    pub pool: Address,
    pub index: u32,
    pub paused: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingRatioSetEvent {
    pub previous: u32,
    pub vesting_ratio_pct: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingLedgerSetEvent {
    pub ledger: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, reward_token: Address, vesting_ratio_pct: u32) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_token,
            vesting_ratio_pct,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funded(env: &Env, from: Address, amount: i128, budget: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), from.clone()),
        FundedEvent {
            from,
            amount,
            budget,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_registered(env: &Env, pool: Address, index: u32, weight: u64, weights_total: u64) {
    env.events().publish(
        (symbol_short!("POOL_REG"), pool.clone()),
        PoolRegisteredEvent {
            pool,
            index,
            weight,
            weights_total,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_collected(env: &Env, pool: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("COLLECTED"), pool.clone()),
        RewardsCollectedEvent {
            pool,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vesting_funded(env: &Env, ledger: Address, amount: i128, allowance: i128) {
    env.events().publish(
        (symbol_short!("VEST_FND"), ledger.clone()),
        VestingFundedEvent {
            ledger,
            amount,
            allowance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_removed(env: &Env, index: u32, source: u32, returned_to_budget: i128) {
    env.events().publish(
        (symbol_short!("POOL_RM"),),
        PoolRemovedEvent {
            index,
            source,
            returned_to_budget,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_paused(env: &Env, pool: Address, index: u32, paused: bool) {
    env.events().publish(
        (symbol_short!("POOL_PSE"), pool.clone()),
        PoolPausedEvent {
            pool,
            index,
            paused,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vesting_ratio_set(env: &Env, previous: u32, vesting_ratio_pct: u32) {
    env.events().publish(
        (symbol_short!("RATIO_SET"),),
        VestingRatioSetEvent {
            previous,
            vesting_ratio_pct,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vesting_ledger_set(env: &Env, ledger: Address) {
    env.events().publish(
        (symbol_short!("VLEDG_SET"),),
        VestingLedgerSetEvent {
            ledger,
            timestamp: env.ledger().timestamp(),
        },
    );
}
