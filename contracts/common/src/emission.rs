//! Front-loaded emission curve for the reward token.
//!
//! The curve releases `initial_bps` of `total_supply` during the first period.
//! Every later period releases `decay_bps` of the previous period's amount, for
//! at most `max_periods` periods. Inside a period emission is linear, so the
//! instantaneous rate is that period's amount divided by its length.
//!
//! ```text
//! e(0)   = total_supply × initial_bps / 10_000
//! e(k+1) = e(k) × decay_bps / 10_000
//! cumulative(t) = min(total_supply, Σ e(j) for full periods + e(k) × (t − k·P) / P)
//! ```
//!
//! Everything is integer arithmetic; two evaluations of the same curve at the
//! same elapsed time always agree bit for bit.

use soroban_sdk::contracttype;

use crate::ContractError;

/// Basis-point denominator for `initial_bps` and `decay_bps`.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Upper bound on `max_periods`; keeps a single evaluation cheap.
pub const MAX_EMISSION_PERIODS: u32 = 100;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionCurve {
    /// Hard cap on everything the curve will ever emit.
    pub total_supply: i128,
    /// Share of `total_supply` released in the first period.
    pub initial_bps: u32,
    /// Share of the previous period's amount released in the next one.
    pub decay_bps: u32,
    /// Length of one period in seconds.
    pub period_seconds: u64,
    /// Number of periods after which emission stops.
    pub max_periods: u32,
}

impl EmissionCurve {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.total_supply <= 0 || self.period_seconds == 0 {
            return Err(ContractError::InvalidInput);
        }
        if self.initial_bps == 0 || i128::from(self.initial_bps) > BPS_DENOMINATOR {
            return Err(ContractError::InvalidInput);
        }
        if i128::from(self.decay_bps) > BPS_DENOMINATOR {
            return Err(ContractError::InvalidInput);
        }
        if self.max_periods == 0 || self.max_periods > MAX_EMISSION_PERIODS {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    /// Amount released over the whole of period `period`.
    pub fn period_emission(&self, period: u32) -> i128 {
        if period >= self.max_periods {
            return 0;
        }
        let mut amount = self.first_period_emission();
        for _ in 0..period {
            amount = Self::decay(amount, self.decay_bps);
            if amount == 0 {
                break;
            }
        }
        amount
    }

    /// Total amount released after `elapsed` seconds.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn cumulative(&self, elapsed: u64) -> i128 {
        let period = self.period_seconds;
        let mut emitted: i128 = 0;
        let mut amount = self.first_period_emission();

        for k in 0..self.max_periods {
            let start = u64::from(k).saturating_mul(period);
            if elapsed <= start || amount == 0 {
                break;
            }
            let into = elapsed - start;
            if into >= period {
                emitted = emitted.saturating_add(amount);
            } else {
                let partial = amount.saturating_mul(i128::from(into)) / i128::from(period);
                emitted = emitted.saturating_add(partial);
                break;
            }
            amount = Self::decay(amount, self.decay_bps);
        }

        emitted.min(self.total_supply)
    }

    /// Tokens per second at `elapsed` seconds; zero once the curve is spent.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn rate(&self, elapsed: u64) -> i128 {
        let k = elapsed / self.period_seconds;
        if k >= u64::from(self.max_periods) {
            return 0;
        }
        if self.cumulative(elapsed) >= self.total_supply {
            return 0;
        }
        self.period_emission(k as u32) / i128::from(self.period_seconds)
    }

    /// Amount released in the half-open interval `(from, to]`.
    pub fn emitted_between(&self, from: u64, to: u64) -> i128 {
        if to <= from {
            return 0;
        }
        self.cumulative(to).saturating_sub(self.cumulative(from))
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn first_period_emission(&self) -> i128 {
        self.total_supply.saturating_mul(i128::from(self.initial_bps)) / BPS_DENOMINATOR
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn decay(amount: i128, decay_bps: u32) -> i128 {
        amount.saturating_mul(i128::from(decay_bps)) / BPS_DENOMINATOR
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
