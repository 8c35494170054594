//! Time-locked stakes and the lock-duration → multiplier table.

use common::{storage, ContractError};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage keys ─────────────────────────────────────────────────────────────

const USER_LOCKS: Symbol = symbol_short!("LOCKS");
const USER_LOCK_CTR: Symbol = symbol_short!("LOCK_CTR");

/// Multiplier scale: `10_000` is 1x, `100_000` is 10x.
pub const MULTIPLIER_PRECISION: i128 = 10_000;

/// Longest multiplier table accepted at initialisation.
pub const MAX_TIERS: u32 = 16;

// ── Types ────────────────────────────────────────────────────────────────────

/// One row of the multiplier table: locks of at least `min_lock_secs` earn
/// `multiplier` (scaled by [`MULTIPLIER_PRECISION`]).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultiplierTier {
    pub min_lock_secs: u64,
    pub multiplier: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedStake {
    /// Opaque identifier, unique per owner.
    pub id: u64,
    pub amount: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub multiplier: u32,
}

impl LockedStake {
    /// Weight this stake contributes to the pool's effective supply.
    pub fn effective_amount(&self) -> i128 {
        effective_amount(self.amount, self.multiplier)
    }

    pub fn is_unlocked(&self, now: u64) -> bool {
        now >= self.end_time
    }
}

#[allow(clippy::arithmetic_side_effects)]
pub fn effective_amount(amount: i128, multiplier: u32) -> i128 {
    amount.saturating_mul(i128::from(multiplier)) / MULTIPLIER_PRECISION
}

// ── Multiplier table ─────────────────────────────────────────────────────────

/// The table must be non-empty, sorted by strictly increasing duration, and
/// carry non-decreasing multipliers of at least 1x.
pub fn validate_tiers(tiers: &Vec<MultiplierTier>) -> Result<(), ContractError> {
    if tiers.is_empty() || tiers.len() > MAX_TIERS {
        return Err(ContractError::InvalidInput);
    }

    let mut prev: Option<MultiplierTier> = None;
    for tier in tiers.iter() {
        if tier.min_lock_secs == 0 || i128::from(tier.multiplier) < MULTIPLIER_PRECISION {
            return Err(ContractError::InvalidInput);
        }
        if let Some(p) = &prev {
            if tier.min_lock_secs <= p.min_lock_secs || tier.multiplier < p.multiplier {
                return Err(ContractError::InvalidInput);
            }
        }
        prev = Some(tier);
    }
    Ok(())
}

/// Multiplier for a lock of `lock_secs`, or `None` when the duration falls
/// outside the table. The last row's duration is also the longest lock.
pub fn multiplier_for(tiers: &Vec<MultiplierTier>, lock_secs: u64) -> Option<u32> {
    let longest = tiers.last()?.min_lock_secs;
    if lock_secs > longest {
        return None;
    }

    let mut found = None;
    for tier in tiers.iter() {
        if lock_secs >= tier.min_lock_secs {
            found = Some(tier.multiplier);
        } else {
            break;
        }
    }
    found
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn locks_key(user: &Address) -> (Symbol, Address) {
    (USER_LOCKS, user.clone())
}

pub fn load_locks(env: &Env, user: &Address) -> Vec<LockedStake> {
    env.storage()
        .persistent()
        .get(&locks_key(user))
        .unwrap_or(Vec::new(env))
}

pub fn store_locks(env: &Env, user: &Address, locks: &Vec<LockedStake>) {
    let key = locks_key(user);
    if locks.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, locks);
    storage::extend_persistent(env, &key);
}

pub fn next_lock_id(env: &Env, user: &Address) -> u64 {
    let key = (USER_LOCK_CTR, user.clone());
    let current: u64 = env.storage().persistent().get(&key).unwrap_or(0);
    let next = current.saturating_add(1);
    env.storage().persistent().set(&key, &next);
    storage::extend_persistent(env, &key);
    next
}

/// Sum of multiplier-weighted locked stakes.
pub fn locked_effective(locks: &Vec<LockedStake>) -> i128 {
    locks
        .iter()
        .fold(0i128, |acc, lock| acc.saturating_add(lock.effective_amount()))
}

/// Sum of raw locked amounts.
pub fn locked_amount(locks: &Vec<LockedStake>) -> i128 {
    locks
        .iter()
        .fold(0i128, |acc, lock| acc.saturating_add(lock.amount))
}

/// Position of stake `id` inside `locks[range_start..range_end]`.
///
/// `range_end` is clamped to the list length so callers may pass `u32::MAX`
/// to search the remainder of the list.
pub fn find_in_range(
    locks: &Vec<LockedStake>,
    id: u64,
    range_start: u32,
    range_end: u32,
) -> Result<u32, ContractError> {
    let end = range_end.min(locks.len());
    if range_start > end {
        return Err(ContractError::InvalidInput);
    }
    for i in range_start..end {
        if locks.get_unchecked(i).id == id {
            return Ok(i);
        }
    }
    Err(ContractError::StakeNotFound)
}
