#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point for the staking pool.
//!
//! ```bash
//! cargo test -p staking_pool --test property
//! PROPTEST_CASES=512 cargo test -p staking_pool --test property
//! ```

mod accrual;
