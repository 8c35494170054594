//! Weighted pool registry and the distributor's budget accounting.
//!
//! Emission is tracked as an accumulator of reward per unit of weight,
//! scaled by [`PRECISION`]. Every interval's emission is capped by the funded
//! budget, split between the vesting ledger and the pools, and credited to
//! pool entries lazily when they are settled.
//!
//! The pool share leaves the budget whole and sits in `pools_reserve` until
//! it is paid. Entries settle against the accumulator with truncation, so the
//! reserve always covers everything they can claim; the leftover dust goes
//! back to the budget once every entry is settled.
//!
//! ```text
//! token balance = budget + pools_reserve + vesting_pending + unspent allowance
//! ```

use common::{ContractError, EmissionCurve, PRECISION};
use soroban_sdk::{contracttype, Address, Vec};

/// Vesting ratio denominator: ratios are whole percent.
pub const RATIO_DENOMINATOR: i128 = 100;

/// Upper bound on registry length; keeps a full settle pass cheap.
pub const MAX_POOLS: u32 = 64;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolEntry {
    pub id: Address,
    pub weight: u64,
    /// Skipped by collection while set; still accrues its share.
    pub paused: bool,
    pub acc_paid: i128,
    /// Settled but not yet transferred to the pool.
    pub owed: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributorState {
    pub acc_reward_per_weight: i128,
    pub last_accrual: u64,
    /// Funded tokens not yet allocated to pools or vesting.
    pub budget: i128,
    /// Allocated to pools, not yet transferred to them.
    pub pools_reserve: i128,
    /// Allocated to the vesting ledger, not yet approved for it.
    pub vesting_pending: i128,
    /// Last allowance granted to the vesting ledger.
    pub vesting_approved: i128,
    /// Ledger sequence after which that allowance lapses.
    pub vesting_live_until: u32,
    pub vesting_ratio_pct: u32,
    pub weights_total: u64,
}

impl DistributorState {
    pub fn new(now: u64, vesting_ratio_pct: u32) -> Self {
        Self {
            acc_reward_per_weight: 0,
            last_accrual: now,
            budget: 0,
            pools_reserve: 0,
            vesting_pending: 0,
            vesting_approved: 0,
            vesting_live_until: 0,
            vesting_ratio_pct,
            weights_total: 0,
        }
    }
}

pub fn validate_ratio(pct: u32) -> Result<(), ContractError> {
    if i128::from(pct) > RATIO_DENOMINATOR {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Split `amount` into `(vesting, pools)` shares.
#[allow(clippy::arithmetic_side_effects)]
pub fn split(amount: i128, vesting_ratio_pct: u32) -> (i128, i128) {
    let vesting = amount.saturating_mul(i128::from(vesting_ratio_pct)) / RATIO_DENOMINATOR;
    (vesting, amount.saturating_sub(vesting))
}

/// Allocate the emission of `(last_accrual, now]` from the budget.
///
/// The pool share moves to `pools_reserve` and is folded into the per-weight
/// accumulator. With an empty registry the pool share stays in the budget.
#[allow(clippy::arithmetic_side_effects)]
pub fn accrue(state: &mut DistributorState, curve: &EmissionCurve, genesis: u64, now: u64) {
    if now <= state.last_accrual {
        return;
    }
    let from = state.last_accrual.saturating_sub(genesis);
    let to = now.saturating_sub(genesis);
    state.last_accrual = now;

    let amount = curve.emitted_between(from, to).min(state.budget);
    if amount <= 0 {
        return;
    }

    let (vesting, pools) = split(amount, state.vesting_ratio_pct);
    let mut allocated = vesting;

    if state.weights_total > 0 {
        let total = i128::from(state.weights_total);
        let delta = pools.saturating_mul(PRECISION) / total;
        state.acc_reward_per_weight = state.acc_reward_per_weight.saturating_add(delta);
        state.pools_reserve = state.pools_reserve.saturating_add(pools);
        allocated = allocated.saturating_add(pools);
    }

    state.vesting_pending = state.vesting_pending.saturating_add(vesting);
    state.budget = state.budget.saturating_sub(allocated);
}

/// Credit `entry` with everything accrued since its last settlement.
#[allow(clippy::arithmetic_side_effects)]
pub fn settle(entry: &mut PoolEntry, acc_reward_per_weight: i128) {
    let fresh = i128::from(entry.weight)
        .saturating_mul(acc_reward_per_weight.saturating_sub(entry.acc_paid))
        / PRECISION;
    entry.owed = entry.owed.saturating_add(fresh);
    entry.acc_paid = acc_reward_per_weight;
}

/// Return truncation dust from `pools_reserve` to the budget.
///
/// Every entry must be settled against the current accumulator; the reserve
/// then only has to cover what the entries are owed.
pub fn release_dust(state: &mut DistributorState, entries: &Vec<PoolEntry>) -> i128 {
    let owed = entries
        .iter()
        .fold(0i128, |acc, e| acc.saturating_add(e.owed));
    let dust = state.pools_reserve.saturating_sub(owed);
    if dust <= 0 {
        return 0;
    }
    state.pools_reserve = owed;
    state.budget = state.budget.saturating_add(dust);
    dust
}

/// Unspent part of a vesting allowance that has lapsed.
///
/// A lapsed allowance reads as zero, so the unspent amount is whatever the
/// distributor holds beyond its other obligations, capped at what was last
/// approved.
pub fn lapsed_allowance(state: &DistributorState, balance: i128) -> i128 {
    let held = balance
        .saturating_sub(state.budget)
        .saturating_sub(state.pools_reserve)
        .saturating_sub(state.vesting_pending);
    held.clamp(0, state.vesting_approved.max(0))
}

pub fn weights_total(entries: &Vec<PoolEntry>) -> u64 {
    entries
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.weight))
}

pub fn position(entries: &Vec<PoolEntry>, id: &Address) -> Option<u32> {
    entries.iter().position(|e| e.id == *id).map(|i| i as u32)
}

/// Validate a registration batch: equal lengths, at least one entry, no id
/// listed twice.
pub fn validate_batch(ids: &Vec<Address>, weights: &Vec<u64>) -> Result<(), ContractError> {
    if ids.is_empty() || ids.len() != weights.len() {
        return Err(ContractError::InvalidInput);
    }
    for i in 0..ids.len() {
        let id = ids.get_unchecked(i);
        for j in (i + 1)..ids.len() {
            if ids.get_unchecked(j) == id {
                return Err(ContractError::DuplicatePool);
            }
        }
    }
    Ok(())
}

/// Overwrite slot `i` with slot `j`, then drop the last slot.
///
/// Entries must already be settled. Only correct for repair batches issued
/// with strictly decreasing `j`. When slot `j` survives next to its copy, the
/// copy starts with nothing owed so the same balance is not paid twice.
/// Returns the owed amount of the entries that disappeared.
pub fn overwrite_and_pop(entries: &mut Vec<PoolEntry>, i: u32, j: u32) -> Result<i128, ContractError> {
    let len = entries.len();
    if i >= len || j >= len || i == j {
        return Err(ContractError::InvalidInput);
    }
    let last = len.saturating_sub(1);

    let replaced = entries.get_unchecked(i);
    let mut copy = entries.get_unchecked(j);
    let mut released = replaced.owed;

    if i != last && j != last {
        released = released.saturating_add(entries.get_unchecked(last).owed);
        copy.owed = 0;
    }

    entries.set(i, copy);
    entries.pop_back();
    Ok(released)
}
