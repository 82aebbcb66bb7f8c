//! Rate limiting: turn a per-minute budget into a dispatch schedule.
//!
//! The schedule is static. Request `i` of a batch fires `i` intervals after
//! the batch starts, regardless of how long earlier requests take. That
//! matches a provider quota counted in requests per minute.

use std::time::Duration;

use crate::config::ConfigError;

/// Budget used when nothing else is configured.
pub const DEFAULT_REQUESTS_PER_MINUTE: i64 = 300;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Uniform spacing between lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    requests_per_minute: u32,
    interval: Duration,
}

impl RateLimiter {
    /// Build a limiter for the given budget.
    ///
    /// Budgets of zero or less can never dispatch anything and are rejected.
    pub fn new(requests_per_minute: i64) -> Result<Self, ConfigError> {
        let requests_per_minute = u32::try_from(requests_per_minute)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidRateLimit(requests_per_minute))?;
        let interval = Duration::from_millis(MILLIS_PER_MINUTE / u64::from(requests_per_minute));
        Ok(Self {
            requests_per_minute,
            interval,
        })
    }

    /// Delay from batch start before the `index`-th request (0-based) may fire.
    pub fn schedule(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.interval.saturating_mul(index)
    }

    /// Spacing between consecutive dispatches.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
