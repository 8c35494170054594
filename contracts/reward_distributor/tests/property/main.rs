#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point for the reward distributor.
//!
//! ```bash
//! cargo test -p reward_distributor --test property
//! ```

mod registry;
