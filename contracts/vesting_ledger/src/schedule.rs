//! Linear-release grants and the compacting claim walk.

use common::{storage, ContractError};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

const SCHEDULES: Symbol = symbol_short!("SCHED");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingSchedule {
    pub beneficiary: Address,
    pub total_vested_amount: i128,
    pub released_amount: i128,
    pub start_time: u64,
}

impl VestingSchedule {
    pub fn is_settled(&self) -> bool {
        self.released_amount >= self.total_vested_amount
    }
}

/// Outcome of one [`settle`] pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settlement {
    pub released: i128,
    pub compacted: u32,
}

/// Amount of `schedule` vested at `now`:
///
/// ```text
/// vested = total × min(now − start, duration) / duration
/// ```
pub fn vested_amount(
    schedule: &VestingSchedule,
    now: u64,
    duration: u64,
) -> Result<i128, ContractError> {
    if duration == 0 {
        return Err(ContractError::InvalidInput);
    }
    let elapsed = now.saturating_sub(schedule.start_time).min(duration);
    let numerator = schedule
        .total_vested_amount
        .checked_mul(i128::from(elapsed))
        .ok_or(ContractError::Overflow)?;
    Ok(numerator / i128::from(duration))
}

pub fn releasable_amount(
    schedule: &VestingSchedule,
    now: u64,
    duration: u64,
) -> Result<i128, ContractError> {
    let vested = vested_amount(schedule, now, duration)?;
    Ok(vested.saturating_sub(schedule.released_amount).max(0))
}

/// Visit up to `count` schedules from `start_index`, releasing what has vested.
///
/// A fully released schedule is compacted: the last slot is moved into its
/// index and the list shrinks by one. The same index is then visited again
/// because it now holds a different schedule. Every visit counts toward
/// `count`, so the walk is bounded even when it keeps compacting.
pub fn settle(
    schedules: &mut Vec<VestingSchedule>,
    start_index: u32,
    count: u32,
    now: u64,
    duration: u64,
) -> Result<Settlement, ContractError> {
    if start_index > schedules.len() {
        return Err(ContractError::InvalidInput);
    }

    let mut out = Settlement::default();
    let mut index = start_index;
    let mut visited = 0u32;

    while visited < count && index < schedules.len() {
        visited = visited.saturating_add(1);

        let mut schedule = schedules.get_unchecked(index);
        let releasable = releasable_amount(&schedule, now, duration)?;
        schedule.released_amount = schedule
            .released_amount
            .checked_add(releasable)
            .ok_or(ContractError::Overflow)?;
        out.released = out
            .released
            .checked_add(releasable)
            .ok_or(ContractError::Overflow)?;

        if schedule.is_settled() {
            let last = schedules.len().saturating_sub(1);
            if index != last {
                let moved = schedules.get_unchecked(last);
                schedules.set(index, moved);
            }
            schedules.pop_back();
            out.compacted = out.compacted.saturating_add(1);
        } else {
            schedules.set(index, schedule);
            index = index.saturating_add(1);
        }
    }

    Ok(out)
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn key(beneficiary: &Address) -> (Symbol, Address) {
    (SCHEDULES, beneficiary.clone())
}

pub fn load(env: &Env, beneficiary: &Address) -> Vec<VestingSchedule> {
    env.storage()
        .persistent()
        .get(&key(beneficiary))
        .unwrap_or(Vec::new(env))
}

pub fn store(env: &Env, beneficiary: &Address, schedules: &Vec<VestingSchedule>) {
    let key = key(beneficiary);
    if schedules.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, schedules);
    storage::extend_persistent(env, &key);
}
