//! Reward-per-share accounting for a staking pool.
//!
//! Every value named `*_per_share*` is scaled by [`PRECISION`] so sub-unit
//! accrual survives integer division. Accrual is lazy: nothing moves until a
//! mutating entry point calls [`accrue`] and then [`checkpoint_user`] for the
//! acting staker.

use common::{ContractError, PRECISION};
use soroban_sdk::contracttype;

/// Pool-wide accrual state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardState {
    pub reward_per_share_stored: i128,
    pub last_update_time: u64,
    pub period_finish: u64,
    /// Tokens emitted per second to all stakers while the period is active.
    pub reward_rate: i128,
    /// Unlocked balances plus multiplier-weighted locked stakes.
    pub effective_total_supply: i128,
    /// Funds received but not yet scheduled into a reward period.
    pub reward_budget: i128,
}

impl RewardState {
    pub fn new(now: u64) -> Self {
        Self {
            reward_per_share_stored: 0,
            last_update_time: now,
            period_finish: now,
            reward_rate: 0,
            effective_total_supply: 0,
            reward_budget: 0,
        }
    }

    /// Latest instant rewards may accrue to: `min(now, period_finish)`.
    pub fn last_time_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    pub fn is_active(&self, now: u64) -> bool {
        now < self.period_finish
    }
}

/// Per-staker position inside one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub unlocked_balance: i128,
    pub reward_per_share_paid: i128,
    pub rewards_earned: i128,
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Advance a stored reward-per-share value by `elapsed` seconds.
///
/// ```text
/// Δrps = reward_rate × elapsed × PRECISION / effective_total_supply
/// ```
///
/// An empty pool accrues nothing; the emission for that interval stays
/// unassigned rather than being divided by zero.
#[allow(clippy::arithmetic_side_effects)]
pub fn compute_reward_per_share(
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    effective_total_supply: i128,
) -> i128 {
    if effective_total_supply <= 0 {
        return stored;
    }

    let delta = reward_rate
        .saturating_mul(elapsed as i128)
        .saturating_mul(PRECISION)
        / effective_total_supply;

    stored.saturating_add(delta)
}

/// Current reward-per-share as of `now`, without mutating `state`.
pub fn reward_per_share(state: &RewardState, now: u64) -> i128 {
    let elapsed = state
        .last_time_applicable(now)
        .saturating_sub(state.last_update_time);
    compute_reward_per_share(
        state.reward_per_share_stored,
        state.reward_rate,
        elapsed,
        state.effective_total_supply,
    )
}

/// Checkpoint the pool: fold accrual up to `min(now, period_finish)` into
/// `reward_per_share_stored`.
pub fn accrue(state: &mut RewardState, now: u64) {
    state.reward_per_share_stored = reward_per_share(state, now);
    state.last_update_time = state.last_update_time.max(state.last_time_applicable(now));
}

/// Rewards owed to a staker with `effective_balance`.
///
/// ```text
/// earned = effective × (current_rps − rps_paid) / PRECISION + rewards_earned
/// ```
#[allow(clippy::arithmetic_side_effects)]
pub fn earned(
    effective_balance: i128,
    current_rps: i128,
    rps_paid: i128,
    rewards_earned: i128,
) -> i128 {
    let fresh = effective_balance.saturating_mul(current_rps.saturating_sub(rps_paid)) / PRECISION;

    rewards_earned.saturating_add(fresh)
}

/// Snapshot a staker against an already-accrued `state`.
pub fn checkpoint_user(state: &RewardState, position: &mut UserPosition, effective_balance: i128) {
    position.rewards_earned = earned(
        effective_balance,
        state.reward_per_share_stored,
        position.reward_per_share_paid,
        position.rewards_earned,
    );
    position.reward_per_share_paid = state.reward_per_share_stored;
}

// ── Funding ─────────────────────────────────────────────────────────────────

/// Fold `amount` of fresh funds into an accrued `state`.
///
/// While a period is active the funds raise `reward_rate` over the time left;
/// the division remainder goes back to the budget. Outside a period the funds
/// wait in the budget for the next renewal.
pub fn fold_funds(state: &mut RewardState, amount: i128, now: u64) -> Result<(), ContractError> {
    if !state.is_active(now) {
        state.reward_budget = state
            .reward_budget
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;
        return Ok(());
    }

    let remaining = i128::from(state.period_finish.saturating_sub(now));
    let leftover = state
        .reward_rate
        .checked_mul(remaining)
        .ok_or(ContractError::Overflow)?;
    let total = leftover.checked_add(amount).ok_or(ContractError::Overflow)?;
    let new_rate = total / remaining;
    let dust = total.saturating_sub(new_rate.saturating_mul(remaining));

    state.reward_rate = new_rate;
    state.reward_budget = state
        .reward_budget
        .checked_add(dust)
        .ok_or(ContractError::Overflow)?;
    Ok(())
}

/// Start a new period of `duration` seconds from the budget.
///
/// Returns `false` when a period is still running or the budget cannot pay
/// at least one token per second.
pub fn start_period(state: &mut RewardState, now: u64, duration: u64) -> Result<bool, ContractError> {
    if state.is_active(now) || duration == 0 {
        return Ok(false);
    }

    let span = i128::from(duration);
    let rate = state.reward_budget / span;
    if rate == 0 {
        return Ok(false);
    }

    state.reward_rate = rate;
    state.reward_budget = state.reward_budget.saturating_sub(rate.saturating_mul(span));
    state.last_update_time = now;
    state.period_finish = now.checked_add(duration).ok_or(ContractError::Overflow)?;
    Ok(true)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// These are pure-math tests with no Soroban environment dependency.
