#![no_std]

pub mod events;
pub mod schedule;

use common::{access, ContractError};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, Symbol, Vec,
};

use schedule::VestingSchedule;

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
/// Sum of `total − released` over every live schedule.
const OUTSTANDING: Symbol = symbol_short!("OUTSTAND");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingConfig {
    pub token: Address,
    /// Account `schedule` pulls grants from via a pre-approved allowance.
    pub funds_provider: Address,
    /// Sole address allowed to create schedules.
    pub vesting_scheduler: Address,
    /// Receives balance in excess of outstanding grants.
    pub treasury: Address,
    pub vesting_duration: u64,
}

#[contract]
pub struct VestingLedger;

#[contractimpl]
impl VestingLedger {
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        funds_provider: Address,
        vesting_scheduler: Address,
        treasury: Address,
        vesting_duration: u64,
    ) -> Result<(), ContractError> {
        if access::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if vesting_duration == 0 {
            return Err(ContractError::InvalidInput);
        }

        access::init(&env, &owner);
        env.storage().instance().set(
            &CONFIG,
            &VestingConfig {
                token: token.clone(),
                funds_provider,
                vesting_scheduler,
                treasury,
                vesting_duration,
            },
        );
        env.storage().instance().set(&OUTSTANDING, &0i128);

        events::publish_initialized(&env, owner, token, vesting_duration);

        Ok(())
    }

    // ── Grants ──────────────────────────────────────────────────────────────

    /// Create a grant of `amount` for `beneficiary`, vesting linearly from now.
    ///
    /// Only the vesting scheduler may call this. The tokens are pulled from
    /// the funds provider, which must have approved this contract for at
    /// least `amount`.
    pub fn schedule(
        env: Env,
        caller: Address,
        beneficiary: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        access::require_initialized(&env)?;
        caller.require_auth();
        let config = Self::load_config(&env)?;
        if caller != config.vesting_scheduler {
            return Err(ContractError::Unauthorized);
        }
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let this = env.current_contract_address();
        let token = token::Client::new(&env, &config.token);
        if token.allowance(&config.funds_provider, &this) < amount
            || token.balance(&config.funds_provider) < amount
        {
            return Err(ContractError::InsufficientBalance);
        }
        token.transfer_from(&this, &config.funds_provider, &this, &amount);

        let mut schedules = schedule::load(&env, &beneficiary);
        schedules.push_back(VestingSchedule {
            beneficiary: beneficiary.clone(),
            total_vested_amount: amount,
            released_amount: 0,
            start_time: env.ledger().timestamp(),
        });
        schedule::store(&env, &beneficiary, &schedules);

        let outstanding = Self::outstanding(env.clone())
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;
        env.storage().instance().set(&OUTSTANDING, &outstanding);

        events::publish_vesting_scheduled(&env, beneficiary, amount);

        Ok(())
    }

    /// Release whatever has vested on up to `count` of the caller's schedules
    /// starting at `start_index`, compacting the ones that are fully paid.
    /// Returns the amount transferred.
    pub fn claim(
        env: Env,
        beneficiary: Address,
        start_index: u32,
        count: u32,
    ) -> Result<i128, ContractError> {
        access::require_initialized(&env)?;
        beneficiary.require_auth();
        access::require_not_paused(&env)?;

        let config = Self::load_config(&env)?;
        let mut schedules = schedule::load(&env, &beneficiary);
        let settled = schedule::settle(
            &mut schedules,
            start_index,
            count,
            env.ledger().timestamp(),
            config.vesting_duration,
        )?;
        schedule::store(&env, &beneficiary, &schedules);

        if settled.compacted > 0 {
            log!(
                &env,
                "compacted {} schedules, {} left",
                settled.compacted,
                schedules.len()
            );
        }

        if settled.released > 0 {
            let outstanding = Self::outstanding(env.clone()).saturating_sub(settled.released);
            env.storage().instance().set(&OUTSTANDING, &outstanding);

            token::Client::new(&env, &config.token).transfer(
                &env.current_contract_address(),
                &beneficiary,
                &settled.released,
            );
            events::publish_reward_claimed(&env, beneficiary, settled.released);
        }

        Ok(settled.released)
    }

    /// Send any balance above outstanding grants to the treasury. Owner only.
    pub fn sweep_excess(env: Env, caller: Address) -> Result<i128, ContractError> {
        access::require_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        access::require_not_paused(&env)?;

        let config = Self::load_config(&env)?;
        let token = token::Client::new(&env, &config.token);
        let this = env.current_contract_address();
        let excess = token
            .balance(&this)
            .saturating_sub(Self::outstanding(env.clone()));

        if excess > 0 {
            token.transfer(&this, &config.treasury, &excess);
            events::publish_excess_swept(&env, config.treasury, excess);
        }

        Ok(excess.max(0))
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn user_vesting_schedules_count(env: Env, beneficiary: Address) -> u32 {
        schedule::load(&env, &beneficiary).len()
    }

    pub fn get_schedules(env: Env, beneficiary: Address) -> Vec<VestingSchedule> {
        schedule::load(&env, &beneficiary)
    }

    /// What `claim(beneficiary, 0, u32::MAX)` would transfer right now.
    pub fn claimable(env: Env, beneficiary: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let now = env.ledger().timestamp();
        let mut total = 0i128;
        for s in schedule::load(&env, &beneficiary).iter() {
            let releasable = schedule::releasable_amount(&s, now, config.vesting_duration)?;
            total = total.checked_add(releasable).ok_or(ContractError::Overflow)?;
        }
        Ok(total)
    }

    pub fn outstanding(env: Env) -> i128 {
        env.storage().instance().get(&OUTSTANDING).unwrap_or(0)
    }

    pub fn get_config(env: Env) -> Result<VestingConfig, ContractError> {
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

    pub fn set_funds_provider(
        env: Env,
        caller: Address,
        funds_provider: Address,
    ) -> Result<(), ContractError> {
        Self::set_role_address(&env, &caller, symbol_short!("FUNDS"), funds_provider, |c| {
            &mut c.funds_provider
        })
    }

    pub fn set_vesting_scheduler(
        env: Env,
        caller: Address,
        vesting_scheduler: Address,
    ) -> Result<(), ContractError> {
        Self::set_role_address(&env, &caller, symbol_short!("SCHEDULER"), vesting_scheduler, |c| {
            &mut c.vesting_scheduler
        })
    }

    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), ContractError> {
        Self::set_role_address(&env, &caller, symbol_short!("TREASURY"), treasury, |c| {
            &mut c.treasury
        })
    }

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

    fn load_config(env: &Env) -> Result<VestingConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    /// Owner-gated swap of one address slot in the config.
    fn set_role_address(
        env: &Env,
        caller: &Address,
        role: Symbol,
        address: Address,
        slot: fn(&mut VestingConfig) -> &mut Address,
    ) -> Result<(), ContractError> {
        access::require_initialized(env)?;
        access::require_owner(env, caller)?;

        let mut config = Self::load_config(env)?;
        let previous = core::mem::replace(slot(&mut config), address.clone());
        env.storage().instance().set(&CONFIG, &config);

        events::publish_role_address_set(env, role, previous, address);

        Ok(())
    }
}
