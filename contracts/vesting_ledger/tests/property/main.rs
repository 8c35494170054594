#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point for the vesting ledger.
//!
//! ```bash
//! cargo test -p vesting_ledger --test property
//! ```

mod settle;
