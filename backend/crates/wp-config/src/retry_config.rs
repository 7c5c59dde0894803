use crate::{ConfigError, ConfigErrorResult};

use std::fmt::Display;
use std::time::Duration;

use serde::Deserialize;

// A publish holds the mutation's response open while it retries, so the
// ceilings stay well under a request timeout
pub const MIN_MAX_ATTEMPTS: u32 = 1;
pub const MAX_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub const MIN_INITIAL_DELAY_MS: u64 = 10;
pub const MAX_INITIAL_DELAY_MS: u64 = 10_000;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 50;

pub const MIN_MAX_DELAY_SECS: u64 = 1;
pub const MAX_MAX_DELAY_SECS: u64 = 60;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 2;

pub const MIN_BACKOFF_MULTIPLIER: f64 = 1.0;
pub const MAX_BACKOFF_MULTIPLIER: f64 = 10.0;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

pub const DEFAULT_JITTER: bool = true;

/// `[retry]`: how hard the publisher retries a failed log append.
///
/// Only the append is retried. Once it succeeds the envelope is published
/// exactly once; if attempts run out the mutation reports the broadcast
/// backend as unavailable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per append, counting the first
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_secs: u64,
    pub backoff_multiplier: f64,
    /// Spread concurrent publishers that failed on the same contention
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    /// Longest a single publish can sleep between attempts, ignoring jitter
    pub fn worst_case_wait(&self) -> Duration {
        let mut delay = self.initial_delay();
        let mut total = Duration::ZERO;
        for _ in 1..self.max_attempts {
            total += delay;
            delay = delay.mul_f64(self.backoff_multiplier).min(self.max_delay());
        }
        total
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range(
            "retry.max_attempts",
            self.max_attempts,
            MIN_MAX_ATTEMPTS,
            MAX_MAX_ATTEMPTS,
        )?;
        check_range(
            "retry.initial_delay_ms",
            self.initial_delay_ms,
            MIN_INITIAL_DELAY_MS,
            MAX_INITIAL_DELAY_MS,
        )?;
        check_range(
            "retry.max_delay_secs",
            self.max_delay_secs,
            MIN_MAX_DELAY_SECS,
            MAX_MAX_DELAY_SECS,
        )?;
        check_range(
            "retry.backoff_multiplier",
            self.backoff_multiplier,
            MIN_BACKOFF_MULTIPLIER,
            MAX_BACKOFF_MULTIPLIER,
        )?;

        if self.initial_delay() > self.max_delay() {
            return Err(ConfigError::config(format!(
                "retry.initial_delay_ms ({}) exceeds retry.max_delay_secs ({})",
                self.initial_delay_ms, self.max_delay_secs
            )));
        }

        Ok(())
    }
}

fn check_range<T>(name: &str, value: T, min: T, max: T) -> ConfigErrorResult<()>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(ConfigError::config(format!(
            "{} must be {}-{}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}
