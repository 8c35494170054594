//! Shared primitives for the emission contract suite.
//!
//! This crate provides:
//! - [`ContractError`]: the error taxonomy returned by every contract.
//! - [`access`]: owner / emergency-executor roles and the pause flag.
//! - [`emission`]: the pure emission curve.
//! - [`interfaces`]: cross-contract clients used by the distributor.
//! - [`storage`]: TTL helpers shared by all ledgers.

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod access;
pub mod emission;
pub mod events;
pub mod interfaces;
pub mod storage;

pub use access::Actor;
pub use emission::EmissionCurve;

/// Fixed-point scale shared by every reward-per-unit accumulator.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes shared by the staking pool, distributor, and vesting ledger.
///
/// Every error aborts the whole invocation; the host rolls back any storage
/// writes and token movements made before it was raised.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authorisation                  |
/// | 20 – 29 | Resource not found             |
/// | 30 – 39 | Validation / invariant input   |
/// | 40 – 49 | Contract state                 |
/// | 50 – 59 | Balances and arithmetic        |
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// The contract has not been initialised yet.
    NotInitialized = 1,

    /// `initialize` was called more than once.
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller is not the owner, emergency executor, scheduler, or
    /// distributor required by the entry point.
    Unauthorized = 10,

    // ── Not-found (20–29) ────────────────────────────────────
    /// No locked stake with the given id exists in the searched range.
    StakeNotFound = 20,

    /// A pool index or pool id does not exist in the registry.
    PoolNotFound = 21,

    // ── Validation (30–39) ───────────────────────────────────
    /// Malformed input: non-positive amounts, mismatched arrays,
    /// out-of-range indices, or an invalid configuration.
    InvalidInput = 30,

    /// The same pool id appears twice in one registration batch.
    DuplicatePool = 31,

    /// Stake and reward token must be different assets.
    TokensIdentical = 32,

    // ── Contract state (40–49) ───────────────────────────────
    /// The component is paused; balance-mutating calls are rejected.
    Paused = 40,

    /// The locked stake has not reached its unlock time.
    Locked = 41,

    /// No ownership transfer is pending.
    NoPendingOwner = 42,

    // ── Balances (50–59) ─────────────────────────────────────
    /// A withdrawal or transfer exceeds the available balance or allowance.
    InsufficientBalance = 50,

    /// A balance computation left the representable range.
    Overflow = 51,
}
