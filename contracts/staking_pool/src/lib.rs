#![no_std]

pub mod events;
pub mod locks;
pub mod rewards;

use common::{access, storage, ContractError};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, Symbol, Vec,
};

use locks::{LockedStake, MultiplierTier};
use rewards::{RewardState, UserPosition};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const STATE: Symbol = symbol_short!("STATE");
const UNLOCKED_STAKES: Symbol = symbol_short!("UNLK_ALL");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const USER_POSITION: Symbol = symbol_short!("POS");

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Immutable wiring plus the tunable period length.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    /// Only address allowed to call `notify_funded`.
    pub distributor: Address,
    /// Length in seconds of every period started by `renew_if_applicable`.
    pub rewards_duration: u64,
    pub multiplier_tiers: Vec<MultiplierTier>,
}

/// Snapshot of a staker's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub unlocked_balance: i128,
    pub locked_balance: i128,
    pub effective_balance: i128,
    pub pending_rewards: i128,
    pub locked_stakes: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPool;

#[contractimpl]
impl StakingPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `stake_token`      – token users deposit.
    /// * `reward_token`     – token paid out as rewards.
    /// * `distributor`      – reward distributor allowed to fund the pool.
    /// * `rewards_duration` – seconds each renewed period lasts.
    /// * `multiplier_tiers` – lock-duration → multiplier table.
    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
        distributor: Address,
        rewards_duration: u64,
        multiplier_tiers: Vec<MultiplierTier>,
    ) -> Result<(), ContractError> {
        if access::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if rewards_duration == 0 {
            return Err(ContractError::InvalidInput);
        }
        locks::validate_tiers(&multiplier_tiers)?;

        let now = env.ledger().timestamp();
        let config = PoolConfig {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            distributor: distributor.clone(),
            rewards_duration,
            multiplier_tiers,
        };

        access::init(&env, &owner);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&STATE, &RewardState::new(now));
        env.storage().instance().set(&UNLOCKED_STAKES, &false);

        events::publish_initialized(
            &env,
            owner,
            stake_token,
            reward_token,
            distributor,
            rewards_duration,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens into the unlocked balance.
    ///
    /// The pool is checkpointed first so the deposit does not earn rewards
    /// retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        staker.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let config = Self::load_config(&env)?;

        // 1. Flush the pool accumulator then snapshot this staker.
        let (mut state, mut position) = Self::checkpoint(&env, &staker)?;

        // 2. Pull tokens from the staker into the pool.
        token::Client::new(&env, &config.stake_token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        // 3. Grow the staker's balance and the effective supply.
        position.unlocked_balance = position
            .unlocked_balance
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;
        state.effective_total_supply = state
            .effective_total_supply
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;

        Self::save_state(&env, &state);
        Self::save_position(&env, &staker, &position);

        events::publish_staked(&env, staker, amount, state.effective_total_supply);

        Ok(())
    }

    /// Deposit `amount` stake tokens locked for `lock_secs`.
    ///
    /// The stake weighs `amount × multiplier` in the effective supply, where
    /// the multiplier comes from the configured tier table. Returns the new
    /// stake's id.
    pub fn stake_locked(
        env: Env,
        staker: Address,
        amount: i128,
        lock_secs: u64,
    ) -> Result<u64, ContractError> {
        access::require_initialized(&env)?;
        staker.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let config = Self::load_config(&env)?;
        let multiplier = locks::multiplier_for(&config.multiplier_tiers, lock_secs)
            .ok_or(ContractError::InvalidInput)?;

        let now = env.ledger().timestamp();
        let end_time = now.checked_add(lock_secs).ok_or(ContractError::Overflow)?;

        let (mut state, position) = Self::checkpoint(&env, &staker)?;

        token::Client::new(&env, &config.stake_token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        let lock = LockedStake {
            id: locks::next_lock_id(&env, &staker),
            amount,
            start_time: now,
            end_time,
            multiplier,
        };
        state.effective_total_supply = state
            .effective_total_supply
            .checked_add(lock.effective_amount())
            .ok_or(ContractError::Overflow)?;

        let mut user_locks = locks::load_locks(&env, &staker);
        user_locks.push_back(lock.clone());
        locks::store_locks(&env, &staker, &user_locks);

        Self::save_state(&env, &state);
        Self::save_position(&env, &staker, &position);

        events::publish_locked_staked(&env, staker, lock.id, amount, multiplier, end_time);

        Ok(lock.id)
    }

    // ── Withdrawals ─────────────────────────────────────────────────────────

    /// Withdraw `amount` from the unlocked balance.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        staker.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if Self::load_position(&env, &staker).unlocked_balance < amount {
            return Err(ContractError::InsufficientBalance);
        }
        let config = Self::load_config(&env)?;

        // 1. Flush rewards before reducing the balance.
        let (mut state, mut position) = Self::checkpoint(&env, &staker)?;

        // 2. Shrink balance and effective supply.
        position.unlocked_balance = position.unlocked_balance.saturating_sub(amount);
        state.effective_total_supply = state.effective_total_supply.saturating_sub(amount);

        Self::save_state(&env, &state);
        Self::save_position(&env, &staker, &position);

        // 3. Return tokens to the staker.
        token::Client::new(&env, &config.stake_token).transfer(
            &env.current_contract_address(),
            &staker,
            &amount,
        );

        events::publish_withdrawn(&env, staker, amount, state.effective_total_supply);

        Ok(())
    }

    /// Withdraw locked stake `stake_id`, searching only the caller's
    /// `[range_start, range_end)` slice of locked stakes.
    ///
    /// Fails with `Locked` before the stake's end time unless the emergency
    /// unlock flag is set. Returns the amount paid back.
    pub fn withdraw_locked(
        env: Env,
        staker: Address,
        stake_id: u64,
        range_start: u32,
        range_end: u32,
    ) -> Result<i128, ContractError> {
        access::require_initialized(&env)?;
        staker.require_auth();
        access::require_not_paused(&env)?;

        let config = Self::load_config(&env)?;
        let mut user_locks = locks::load_locks(&env, &staker);
        let index = locks::find_in_range(&user_locks, stake_id, range_start, range_end)?;
        let lock = user_locks.get_unchecked(index);

        let now = env.ledger().timestamp();
        let early = !lock.is_unlocked(now);
        if early && !Self::unlocked_stakes(env.clone()) {
            return Err(ContractError::Locked);
        }

        // The stake still counts for the interval up to now.
        let (mut state, position) = Self::checkpoint(&env, &staker)?;

        user_locks.remove(index);
        locks::store_locks(&env, &staker, &user_locks);
        state.effective_total_supply = state
            .effective_total_supply
            .saturating_sub(lock.effective_amount());

        Self::save_state(&env, &state);
        Self::save_position(&env, &staker, &position);

        token::Client::new(&env, &config.stake_token).transfer(
            &env.current_contract_address(),
            &staker,
            &lock.amount,
        );

        events::publish_locked_withdrawn(&env, staker, stake_id, lock.amount, early);

        Ok(lock.amount)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has earned so far.
    pub fn get_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        access::require_initialized(&env)?;
        staker.require_auth();
        access::require_not_paused(&env)?;

        let config = Self::load_config(&env)?;
        let (state, mut position) = Self::checkpoint(&env, &staker)?;

        let reward = position.rewards_earned;
        let reward_token = token::Client::new(&env, &config.reward_token);
        if reward > 0 && reward_token.balance(&env.current_contract_address()) < reward {
            return Err(ContractError::InsufficientBalance);
        }
        position.rewards_earned = 0;

        Self::save_state(&env, &state);
        Self::save_position(&env, &staker, &position);

        if reward > 0 {
            reward_token.transfer(&env.current_contract_address(), &staker, &reward);
            events::publish_reward_claimed(&env, staker, reward);
        }

        Ok(reward)
    }

    /// Fold `amount` freshly transferred reward tokens into the pool.
    ///
    /// Only the configured distributor may call this, after it has moved the
    /// tokens. During an active period the reward rate rises for the time
    /// left; otherwise the funds wait for `renew_if_applicable`.
    pub fn notify_funded(env: Env, amount: i128) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        let config = Self::load_config(&env)?;
        config.distributor.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let now = env.ledger().timestamp();
        let mut state = Self::load_state(&env)?;
        rewards::accrue(&mut state, now);
        rewards::fold_funds(&mut state, amount, now)?;
        Self::save_state(&env, &state);

        events::publish_funded(&env, amount, state.reward_rate, state.reward_budget);

        Ok(())
    }

    /// Start a new reward period from the pool budget once the current one
    /// has finished. Anyone may call this; nothing accrues past
    /// `period_finish` until somebody does. Moves no tokens, so it also runs
    /// while the pool is paused.
    pub fn renew_if_applicable(env: Env) -> Result<bool, ContractError> {
        access::require_initialized(&env)?;

        let config = Self::load_config(&env)?;
        let now = env.ledger().timestamp();
        let mut state = Self::load_state(&env)?;

        rewards::accrue(&mut state, now);
        let renewed = rewards::start_period(&mut state, now, config.rewards_duration)?;
        Self::save_state(&env, &state);

        if renewed {
            log!(
                &env,
                "period renewed: rate {} until {}",
                state.reward_rate,
                state.period_finish
            );
            events::publish_period_renewed(&env, state.reward_rate, state.period_finish);
        }

        Ok(renewed)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Real-time pending rewards for `staker` without mutating state.
    pub fn earned(env: Env, staker: Address) -> i128 {
        let state = match Self::load_state(&env) {
            Ok(state) => state,
            Err(_) => return 0,
        };
        let position = Self::load_position(&env, &staker);
        let effective = Self::effective_balance_of(&env, &staker, &position);
        let current_rps = rewards::reward_per_share(&state, env.ledger().timestamp());

        rewards::earned(
            effective,
            current_rps,
            position.reward_per_share_paid,
            position.rewards_earned,
        )
    }

    /// Unlocked balance plus multiplier-weighted locked stakes.
    pub fn effective_balance(env: Env, staker: Address) -> i128 {
        let position = Self::load_position(&env, &staker);
        Self::effective_balance_of(&env, &staker, &position)
    }

    pub fn get_position(env: Env, staker: Address) -> UserPosition {
        Self::load_position(&env, &staker)
    }

    /// Combined view of a staker's balances and pending rewards.
    pub fn get_staker_info(env: Env, staker: Address) -> StakerInfo {
        let position = Self::load_position(&env, &staker);
        let user_locks = locks::load_locks(&env, &staker);

        StakerInfo {
            unlocked_balance: position.unlocked_balance,
            locked_balance: locks::locked_amount(&user_locks),
            effective_balance: position
                .unlocked_balance
                .saturating_add(locks::locked_effective(&user_locks)),
            pending_rewards: Self::earned(env.clone(), staker),
            locked_stakes: user_locks.len(),
        }
    }

    pub fn locked_stakes(env: Env, staker: Address) -> Vec<LockedStake> {
        locks::load_locks(&env, &staker)
    }

    pub fn locked_stakes_count(env: Env, staker: Address) -> u32 {
        locks::load_locks(&env, &staker).len()
    }

    /// Multiplier a lock of `lock_secs` would receive today.
    pub fn multiplier_for(env: Env, lock_secs: u64) -> Result<u32, ContractError> {
        let config = Self::load_config(&env)?;
        locks::multiplier_for(&config.multiplier_tiers, lock_secs).ok_or(ContractError::InvalidInput)
    }

    pub fn get_reward_state(env: Env) -> Result<RewardState, ContractError> {
        Self::load_state(&env)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, ContractError> {
        Self::load_config(&env)
    }

    pub fn unlocked_stakes(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&UNLOCKED_STAKES)
            .unwrap_or(false)
    }

    pub fn is_paused(env: Env) -> bool {
        access::is_paused(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        access::is_initialized(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        access::owner(&env)
    }

    pub fn get_emergency_executor(env: Env) -> Option<Address> {
        access::emergency_executor(&env)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        access::pending_owner(&env)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Pause or resume every balance-mutating entry point.
    /// Owner or emergency executor.
    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), ContractError> {
        access::set_paused(&env, &caller, paused)
    }

    /// Allow locked stakes to be withdrawn before their end time.
    /// Owner or emergency executor.
    pub fn set_unlocked_stakes(
        env: Env,
        caller: Address,
        unlocked: bool,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_guardian(&env, &caller)?;

        env.storage().instance().set(&UNLOCKED_STAKES, &unlocked);

        events::publish_unlocked_stakes_set(&env, caller, unlocked);

        Ok(())
    }

    /// Change the length of periods started from now on. Owner only.
    pub fn set_rewards_duration(
        env: Env,
        caller: Address,
        rewards_duration: u64,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;

        if rewards_duration == 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut config = Self::load_config(&env)?;
        config.rewards_duration = rewards_duration;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_rewards_duration_set(&env, rewards_duration);

        Ok(())
    }

    pub fn set_emergency_executor(
        env: Env,
        caller: Address,
        executor: Address,
    ) -> Result<(), ContractError> {
        access::set_emergency_executor(&env, &caller, &executor)
    }

    pub fn propose_owner(env: Env, caller: Address, new_owner: Address) -> Result<(), ContractError> {
        access::propose_owner(&env, &caller, &new_owner)
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        access::accept_owner(&env, &new_owner)
    }

    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        access::cancel_owner_transfer(&env, &caller)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<PoolConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_state(env: &Env) -> Result<RewardState, ContractError> {
        env.storage()
            .instance()
            .get(&STATE)
            .ok_or(ContractError::NotInitialized)
    }

    fn save_state(env: &Env, state: &RewardState) {
        env.storage().instance().set(&STATE, state);
    }

    fn load_position(env: &Env, staker: &Address) -> UserPosition {
        env.storage()
            .persistent()
            .get(&(USER_POSITION, staker.clone()))
            .unwrap_or_default()
    }

    fn save_position(env: &Env, staker: &Address, position: &UserPosition) {
        let key = (USER_POSITION, staker.clone());
        env.storage().persistent().set(&key, position);
        storage::extend_persistent(env, &key);
    }

    fn effective_balance_of(env: &Env, staker: &Address, position: &UserPosition) -> i128 {
        let user_locks = locks::load_locks(env, staker);
        position
            .unlocked_balance
            .saturating_add(locks::locked_effective(&user_locks))
    }

    /// Full per-staker checkpoint.
    ///
    /// 1. Accrue the pool up to `min(now, period_finish)`.
    /// 2. Credit the staker for the accrual since their last snapshot, using
    ///    the effective balance rebuilt from stored unlocked and locked stakes.
    /// 3. Hand both back so the caller can mutate and persist them together.
    fn checkpoint(env: &Env, staker: &Address) -> Result<(RewardState, UserPosition), ContractError> {
        let mut state = Self::load_state(env)?;
        rewards::accrue(&mut state, env.ledger().timestamp());

        let mut position = Self::load_position(env, staker);
        let effective = Self::effective_balance_of(env, staker, &position);
        rewards::checkpoint_user(&state, &mut position, effective);

        Ok((state, position))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_locked;

#[cfg(test)]
mod test_admin;
