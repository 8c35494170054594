//! Owner / emergency-executor roles and the component pause flag.
//!
//! Every contract in the suite mixes this module in the same way: the owner is
//! bootstrapped by `initialize`, privileged entry points resolve the caller to
//! an [`Actor`] once, and balance-mutating entry points call
//! [`require_not_paused`] before touching state.
//!
//! The owner is an opaque address. It may be an account or a governance
//! contract (multisig, timelock); ownership therefore moves in two steps so a
//! queued authority can accept on its own schedule.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{events, storage, ContractError};

// ── Storage keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const EMERGENCY: Symbol = symbol_short!("EMRG_EXE");
const PAUSED: Symbol = symbol_short!("PAUSED");

// ── Actor ────────────────────────────────────────────────────────────────────

/// Role held by a caller of a privileged entry point.
///
/// - `Owner`             – may do everything, including appointing the
///                         emergency executor and transferring ownership.
/// - `EmergencyExecutor` – may only toggle pause and safety switches.
/// - `Other`             – holds no privileged role.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Actor {
    Owner,
    EmergencyExecutor,
    Other,
}

impl Actor {
    /// Returns true for the roles allowed to flip safety switches.
    pub fn is_guardian(&self) -> bool {
        matches!(self, Actor::Owner | Actor::EmergencyExecutor)
    }
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Stores the initial owner. Callers must reject re-initialisation first.
pub fn init(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
    env.storage().instance().set(&PAUSED, &false);
    storage::extend_instance(env);
}

/// Whether [`init`] has run for this contract instance.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&OWNER)
}

/// Guard: fails with `NotInitialized` before [`init`] has run.
pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if !is_initialized(env) {
        return Err(ContractError::NotInitialized);
    }
    storage::extend_instance(env);
    Ok(())
}

// ── Role resolution ──────────────────────────────────────────────────────────

pub fn owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(ContractError::NotInitialized)
}

pub fn emergency_executor(env: &Env) -> Option<Address> {
    env.storage().instance().get(&EMERGENCY)
}

pub fn pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

/// Maps `caller` to its role without requiring its signature.
pub fn resolve(env: &Env, caller: &Address) -> Result<Actor, ContractError> {
    if *caller == owner(env)? {
        return Ok(Actor::Owner);
    }
    if emergency_executor(env).as_ref() == Some(caller) {
        return Ok(Actor::EmergencyExecutor);
    }
    Ok(Actor::Other)
}

/// Authenticates `caller` and resolves its role.
pub fn authorize(env: &Env, caller: &Address) -> Result<Actor, ContractError> {
    caller.require_auth();
    resolve(env, caller)
}

/// Guard: `caller` must sign and be the owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    match authorize(env, caller)? {
        Actor::Owner => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

/// Guard: `caller` must sign and be the owner or the emergency executor.
pub fn require_guardian(env: &Env, caller: &Address) -> Result<Actor, ContractError> {
    let actor = authorize(env, caller)?;
    if !actor.is_guardian() {
        return Err(ContractError::Unauthorized);
    }
    Ok(actor)
}

// ── Pause ────────────────────────────────────────────────────────────────────

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

/// Guard: rejects balance-mutating calls while the component is paused.
pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if is_paused(env) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

/// Sets the pause flag. Owner or emergency executor only.
pub fn set_paused(env: &Env, caller: &Address, paused: bool) -> Result<(), ContractError> {
    require_initialized(env)?;
    require_guardian(env, caller)?;

    env.storage().instance().set(&PAUSED, &paused);
    events::publish_paused_toggled(env, caller.clone(), paused);
    Ok(())
}

// ── Emergency executor ───────────────────────────────────────────────────────

/// Appoints (or replaces) the single emergency executor. Owner only.
pub fn set_emergency_executor(
    env: &Env,
    caller: &Address,
    executor: &Address,
) -> Result<(), ContractError> {
    require_initialized(env)?;
    require_owner(env, caller)?;

    let previous = emergency_executor(env);
    env.storage().instance().set(&EMERGENCY, executor);
    events::publish_emergency_executor_changed(env, previous, executor.clone());
    Ok(())
}

// ── Ownership transfer (two-step) ────────────────────────────────────────────

/// Nominates `new_owner`. The nominee completes the move with [`accept_owner`].
pub fn propose_owner(
    env: &Env,
    caller: &Address,
    new_owner: &Address,
) -> Result<(), ContractError> {
    require_initialized(env)?;
    require_owner(env, caller)?;

    env.storage().instance().set(&PENDING_OWNER, new_owner);
    events::publish_owner_proposed(env, caller.clone(), new_owner.clone());
    Ok(())
}

/// Completes a pending transfer. Only the nominee may call this.
pub fn accept_owner(env: &Env, new_owner: &Address) -> Result<(), ContractError> {
    require_initialized(env)?;
    new_owner.require_auth();

    let pending = pending_owner(env).ok_or(ContractError::NoPendingOwner)?;
    if *new_owner != pending {
        return Err(ContractError::Unauthorized);
    }

    let previous = owner(env)?;
    env.storage().instance().set(&OWNER, new_owner);
    env.storage().instance().remove(&PENDING_OWNER);
    events::publish_owner_accepted(env, previous, new_owner.clone());
    Ok(())
}

/// Drops a pending nomination. Owner only.
pub fn cancel_owner_transfer(env: &Env, caller: &Address) -> Result<(), ContractError> {
    require_initialized(env)?;
    require_owner(env, caller)?;

    let pending = pending_owner(env).ok_or(ContractError::NoPendingOwner)?;
    env.storage().instance().remove(&PENDING_OWNER);
    events::publish_owner_transfer_cancelled(env, caller.clone(), pending);
    Ok(())
}
