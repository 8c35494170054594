#![no_std]

pub mod events;
pub mod registry;

use common::{access, interfaces::PoolFundingClient, ContractError, EmissionCurve};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, Symbol, Vec,
};

use registry::{DistributorState, PoolEntry};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const STATE: Symbol = symbol_short!("STATE");
const POOLS: Symbol = symbol_short!("POOLS");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributorConfig {
    pub reward_token: Address,
    pub curve: EmissionCurve,
    /// Ledger time the curve is measured from.
    pub genesis: u64,
    /// Receives the vesting share as an allowance once set.
    pub vesting_ledger: Option<Address>,
}

#[contract]
pub struct RewardDistributor;

#[contractimpl]
impl RewardDistributor {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the distributor. The emission curve starts at the current
    /// ledger time.
    pub fn initialize(
        env: Env,
        owner: Address,
        reward_token: Address,
        curve: EmissionCurve,
        vesting_ratio_pct: u32,
    ) -> Result<(), ContractError> {
        if access::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        curve.validate()?;
        registry::validate_ratio(vesting_ratio_pct)?;

        let now = env.ledger().timestamp();
        access::init(&env, &owner);
        env.storage().instance().set(
            &CONFIG,
            &DistributorConfig {
                reward_token: reward_token.clone(),
                curve,
                genesis: now,
                vesting_ledger: None,
            },
        );
        env.storage()
            .instance()
            .set(&STATE, &DistributorState::new(now, vesting_ratio_pct));
        env.storage()
            .instance()
            .set(&POOLS, &Vec::<PoolEntry>::new(&env));

        events::publish_initialized(&env, owner, reward_token, vesting_ratio_pct);

        Ok(())
    }

    // ── Funding ─────────────────────────────────────────────────────────────

    /// Deposit `amount` reward tokens into the shared budget.
    pub fn fund(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        from.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let config = Self::load_config(&env)?;

        // Past intervals are allocated against the budget they had.
        let mut state = Self::accrued_state(&env, &config)?;

        token::Client::new(&env, &config.reward_token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        state.budget = state
            .budget
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;
        Self::save_state(&env, &state);

        events::publish_funded(&env, from, amount, state.budget);

        Ok(())
    }

    /// Pay every unpaused pool in `[start, end)` what it has accrued, then
    /// hand the pending vesting share to the vesting ledger. Anyone may call
    /// this; callers page through large registries with several calls.
    /// Returns the total sent to pools.
    ///
    /// A pool that refuses the funding notification keeps its balance owed
    /// and is retried on the next collection.
    pub fn collect_all_rewards(env: Env, start: u32, end: u32) -> Result<i128, ContractError> {
        access::require_initialized(&env)?;
        access::require_not_paused(&env)?;

        let config = Self::load_config(&env)?;
        let mut entries = Self::load_pools(&env);
        if start > end || end > entries.len() {
            return Err(ContractError::InvalidInput);
        }

        let mut state = Self::accrued_state(&env, &config)?;
        let this = env.current_contract_address();
        let reward_token = token::Client::new(&env, &config.reward_token);
        let mut collected = 0i128;

        for index in start..end {
            let mut entry = entries.get_unchecked(index);
            registry::settle(&mut entry, state.acc_reward_per_weight);

            if !entry.paused && entry.owed > 0 {
                let amount = entry.owed;
                let pool = PoolFundingClient::new(&env, &entry.id);
                if let Ok(Ok(())) = pool.try_notify_funded(&amount) {
                    reward_token.transfer(&this, &entry.id, &amount);
                    entry.owed = 0;
                    state.pools_reserve = state
                        .pools_reserve
                        .checked_sub(amount)
                        .ok_or(ContractError::Overflow)?;
                    collected = collected
                        .checked_add(amount)
                        .ok_or(ContractError::Overflow)?;
                    events::publish_rewards_collected(&env, entry.id.clone(), amount);
                } else {
                    log!(&env, "pool {} refused funding, {} stays owed", index, amount);
                }
            }
            entries.set(index, entry);
        }

        if start == 0 && end == entries.len() {
            registry::release_dust(&mut state, &entries);
        }

        if let Some(ledger) = config.vesting_ledger {
            Self::refresh_vesting_allowance(&env, &reward_token, &ledger, &mut state)?;
        }

        Self::save_state(&env, &state);
        env.storage().instance().set(&POOLS, &entries);

        Ok(collected)
    }

    // ── Registry ────────────────────────────────────────────────────────────

    /// Add pools or change the weight of registered ones. Owner only.
    ///
    /// `ids` and `weights` pair up by position. An id listed twice in one
    /// batch is rejected; an id already registered has its weight replaced.
    pub fn register_pools(
        env: Env,
        caller: Address,
        ids: Vec<Address>,
        weights: Vec<u64>,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        registry::validate_batch(&ids, &weights)?;

        let config = Self::load_config(&env)?;
        let mut state = Self::accrued_state(&env, &config)?;
        let mut entries = Self::load_pools(&env);

        let mut touched = Vec::<u32>::new(&env);
        for (id, weight) in ids.iter().zip(weights.iter()) {
            match registry::position(&entries, &id) {
                Some(index) => {
                    let mut entry = entries.get_unchecked(index);
                    registry::settle(&mut entry, state.acc_reward_per_weight);
                    entry.weight = weight;
                    entries.set(index, entry);
                    touched.push_back(index);
                }
                None => {
                    if entries.len() >= registry::MAX_POOLS {
                        return Err(ContractError::InvalidInput);
                    }
                    entries.push_back(PoolEntry {
                        id,
                        weight,
                        paused: false,
                        acc_paid: state.acc_reward_per_weight,
                        owed: 0,
                    });
                    touched.push_back(entries.len().saturating_sub(1));
                }
            }
        }

        state.weights_total = registry::weights_total(&entries);
        Self::save_state(&env, &state);
        env.storage().instance().set(&POOLS, &entries);

        for index in touched.iter() {
            let entry = entries.get_unchecked(index);
            events::publish_pool_registered(&env, entry.id, index, entry.weight, state.weights_total);
        }

        Ok(())
    }

    /// Registry repair: overwrite slot `i` with slot `j`, then drop the last
    /// slot. Owner only.
    ///
    /// Only correct when a repair batch is issued with strictly decreasing
    /// `j`. Anything still owed to an entry that disappears goes back to the
    /// budget.
    pub fn remove_duplicate_pool(
        env: Env,
        caller: Address,
        i: u32,
        j: u32,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;

        let config = Self::load_config(&env)?;
        let mut state = Self::accrued_state(&env, &config)?;
        let mut entries = Self::load_pools(&env);

        let mut settled = Vec::<PoolEntry>::new(&env);
        for mut entry in entries.iter() {
            registry::settle(&mut entry, state.acc_reward_per_weight);
            settled.push_back(entry);
        }
        entries = settled;

        let returned = registry::overwrite_and_pop(&mut entries, i, j)?;
        state.pools_reserve = state
            .pools_reserve
            .checked_sub(returned)
            .ok_or(ContractError::Overflow)?;
        state.budget = state
            .budget
            .checked_add(returned)
            .ok_or(ContractError::Overflow)?;
        registry::release_dust(&mut state, &entries);
        state.weights_total = registry::weights_total(&entries);

        Self::save_state(&env, &state);
        env.storage().instance().set(&POOLS, &entries);

        log!(
            &env,
            "registry repair: slot {} <- {}, {} entries left",
            i,
            j,
            entries.len()
        );
        events::publish_pool_removed(&env, i, j, returned);

        Ok(())
    }

    /// Skip (or resume) the entry at `index` during collection. Its share
    /// keeps accruing meanwhile. Owner or emergency executor.
    pub fn set_pool_paused(
        env: Env,
        caller: Address,
        index: u32,
        paused: bool,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_guardian(&env, &caller)?;

        let mut entries = Self::load_pools(&env);
        let mut entry = entries.get(index).ok_or(ContractError::PoolNotFound)?;
        entry.paused = paused;
        entries.set(index, entry.clone());
        env.storage().instance().set(&POOLS, &entries);

        events::publish_pool_paused(&env, entry.id, index, paused);

        Ok(())
    }

    // ── Vesting ─────────────────────────────────────────────────────────────

    /// Change the vesting share of future emission. Owner only.
    pub fn set_vesting_reward_ratio(
        env: Env,
        caller: Address,
        vesting_ratio_pct: u32,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        registry::validate_ratio(vesting_ratio_pct)?;

        // Everything emitted so far is split at the old ratio.
        let config = Self::load_config(&env)?;
        let mut state = Self::accrued_state(&env, &config)?;
        let previous = state.vesting_ratio_pct;
        state.vesting_ratio_pct = vesting_ratio_pct;
        Self::save_state(&env, &state);

        events::publish_vesting_ratio_set(&env, previous, vesting_ratio_pct);

        Ok(())
    }

    /// Point the vesting share at `ledger`. Owner only.
    ///
    /// An allowance left with a previous ledger is revoked and its unspent
    /// part goes back to the pending vesting share.
    pub fn set_vesting_ledger(env: Env, caller: Address, ledger: Address) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;

        let mut config = Self::load_config(&env)?;
        if let Some(previous) = config.vesting_ledger.clone() {
            if previous != ledger {
                let mut state = Self::load_state(&env)?;
                let reward_token = token::Client::new(&env, &config.reward_token);
                let unspent = Self::unspent_allowance(&env, &reward_token, &previous, &state);
                if state.vesting_approved > 0 {
                    reward_token.approve(
                        &env.current_contract_address(),
                        &previous,
                        &0,
                        &env.ledger().sequence(),
                    );
                }
                state.vesting_pending = state
                    .vesting_pending
                    .checked_add(unspent)
                    .ok_or(ContractError::Overflow)?;
                state.vesting_approved = 0;
                state.vesting_live_until = 0;
                Self::save_state(&env, &state);
            }
        }
        config.vesting_ledger = Some(ledger.clone());
        env.storage().instance().set(&CONFIG, &config);

        events::publish_vesting_ledger_set(&env, ledger);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn pools(env: Env) -> Vec<PoolEntry> {
        Self::load_pools(&env)
    }

    pub fn pool_count(env: Env) -> u32 {
        Self::load_pools(&env).len()
    }

    pub fn weights_total(env: Env) -> Result<u64, ContractError> {
        Ok(Self::load_state(&env)?.weights_total)
    }

    /// What the pool at `index` would receive from a collection right now.
    pub fn pending_for_pool(env: Env, index: u32) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let state = Self::accrued_state(&env, &config)?;
        let mut entry = Self::load_pools(&env)
            .get(index)
            .ok_or(ContractError::PoolNotFound)?;
        registry::settle(&mut entry, state.acc_reward_per_weight);
        Ok(entry.owed)
    }

    /// Vesting share allocated but not yet approved for the vesting ledger.
    pub fn pending_vesting(env: Env) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        Ok(Self::accrued_state(&env, &config)?.vesting_pending)
    }

    /// Emission rate of the curve at the current ledger time.
    pub fn current_rate(env: Env) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let elapsed = env.ledger().timestamp().saturating_sub(config.genesis);
        Ok(config.curve.rate(elapsed))
    }

    pub fn get_state(env: Env) -> Result<DistributorState, ContractError> {
        Self::load_state(&env)
    }

    pub fn get_config(env: Env) -> Result<DistributorConfig, ContractError> {
        Self::load_config(&env)
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

    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), ContractError> {
        access::set_paused(&env, &caller, paused)
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

    fn load_config(env: &Env) -> Result<DistributorConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_state(env: &Env) -> Result<DistributorState, ContractError> {
        env.storage()
            .instance()
            .get(&STATE)
            .ok_or(ContractError::NotInitialized)
    }

    fn save_state(env: &Env, state: &DistributorState) {
        env.storage().instance().set(&STATE, state);
    }

    fn load_pools(env: &Env) -> Vec<PoolEntry> {
        env.storage()
            .instance()
            .get(&POOLS)
            .unwrap_or(Vec::new(env))
    }

    /// Allowance the vesting ledger can still spend. A lapsed allowance is
    /// recovered from the balance.
    fn unspent_allowance(
        env: &Env,
        reward_token: &token::Client,
        ledger: &Address,
        state: &DistributorState,
    ) -> i128 {
        let this = env.current_contract_address();
        if env.ledger().sequence() <= state.vesting_live_until {
            reward_token.allowance(&this, ledger)
        } else {
            registry::lapsed_allowance(state, reward_token.balance(&this))
        }
    }

    /// Re-approve the vesting ledger for its unspent allowance plus the
    /// pending share. Also renews an allowance that has lapsed.
    fn refresh_vesting_allowance(
        env: &Env,
        reward_token: &token::Client,
        ledger: &Address,
        state: &mut DistributorState,
    ) -> Result<(), ContractError> {
        let lapsed = env.ledger().sequence() > state.vesting_live_until;
        let unspent = Self::unspent_allowance(env, reward_token, ledger, state);
        if state.vesting_pending == 0 && (!lapsed || unspent == 0) {
            state.vesting_approved = unspent;
            return Ok(());
        }

        let pending = state.vesting_pending;
        let allowance = unspent.checked_add(pending).ok_or(ContractError::Overflow)?;
        let live_until = env.ledger().max_live_until_ledger();
        reward_token.approve(&env.current_contract_address(), ledger, &allowance, &live_until);

        state.vesting_pending = 0;
        state.vesting_approved = allowance;
        state.vesting_live_until = live_until;
        events::publish_vesting_funded(env, ledger.clone(), pending, allowance);
        Ok(())
    }

    /// Stored state with emission allocated up to now. Not persisted.
    fn accrued_state(env: &Env, config: &DistributorConfig) -> Result<DistributorState, ContractError> {
        let mut state = Self::load_state(env)?;
        registry::accrue(
            &mut state,
            &config.curve,
            config.genesis,
            env.ledger().timestamp(),
        );
        Ok(state)
    }
}
