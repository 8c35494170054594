#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub vesting_duration: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingScheduledEvent {
    pub beneficiary: Address,
    pub amount: i128,
    pub start_time: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub beneficiary: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired by every owner-gated address setter. `role` names the slot.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleAddressSetEvent {
    pub role: Symbol,
    pub previous: Address,
    pub current: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExcessSweptEvent {
    pub treasury: Address,
    pub amount: i128,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, owner: Address, token: Address, vesting_duration: u64) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            token,
            vesting_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vesting_scheduled(env: &Env, beneficiary: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("VEST_SCH"), beneficiary.clone()),
        VestingScheduledEvent {
            beneficiary,
            amount,
            start_time: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, beneficiary: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), beneficiary.clone()),
        RewardClaimedEvent {
            beneficiary,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_address_set(env: &Env, role: Symbol, previous: Address, current: Address) {
    env.events().publish(
        (symbol_short!("ROLE_SET"), role.clone()),
        RoleAddressSetEvent {
            role,
            previous,
            current,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_excess_swept(env: &Env, treasury: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("SWEPT"), treasury.clone()),
        ExcessSweptEvent {
            treasury,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
