use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_RECONNECT_INITIAL_DELAY_MS: u64 = 10;
pub const MAX_RECONNECT_INITIAL_DELAY_MS: u64 = 10_000;
pub const DEFAULT_RECONNECT_INITIAL_DELAY_MS: u64 = 250;

pub const MIN_RECONNECT_MAX_DELAY_SECS: u64 = 1;
pub const MAX_RECONNECT_MAX_DELAY_SECS: u64 = 300;
pub const DEFAULT_RECONNECT_MAX_DELAY_SECS: u64 = 30;

pub const MIN_RECONNECT_MULTIPLIER: f64 = 1.0;
pub const MAX_RECONNECT_MULTIPLIER: f64 = 10.0;
pub const DEFAULT_RECONNECT_MULTIPLIER: f64 = 2.0;

/// Client-side reconnect backoff after a dropped stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub initial_delay_ms: u64,
    pub max_delay_secs: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: DEFAULT_RECONNECT_INITIAL_DELAY_MS,
            max_delay_secs: DEFAULT_RECONNECT_MAX_DELAY_SECS,
            backoff_multiplier: DEFAULT_RECONNECT_MULTIPLIER,
            jitter: true,
        }
    }
}

impl ReconnectConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.initial_delay_ms < MIN_RECONNECT_INITIAL_DELAY_MS
            || self.initial_delay_ms > MAX_RECONNECT_INITIAL_DELAY_MS
        {
            return Err(ConfigError::config(format!(
                "reconnect.initial_delay_ms must be {}-{}, got {}",
                MIN_RECONNECT_INITIAL_DELAY_MS, MAX_RECONNECT_INITIAL_DELAY_MS, self.initial_delay_ms
            )));
        }

        if self.max_delay_secs < MIN_RECONNECT_MAX_DELAY_SECS
            || self.max_delay_secs > MAX_RECONNECT_MAX_DELAY_SECS
        {
            return Err(ConfigError::config(format!(
                "reconnect.max_delay_secs must be {}-{}, got {}",
                MIN_RECONNECT_MAX_DELAY_SECS, MAX_RECONNECT_MAX_DELAY_SECS, self.max_delay_secs
            )));
        }

        if self.backoff_multiplier < MIN_RECONNECT_MULTIPLIER
            || self.backoff_multiplier > MAX_RECONNECT_MULTIPLIER
        {
            return Err(ConfigError::config(format!(
                "reconnect.backoff_multiplier must be {}-{}, got {}",
                MIN_RECONNECT_MULTIPLIER, MAX_RECONNECT_MULTIPLIER, self.backoff_multiplier
            )));
        }

        if Duration::from_millis(self.initial_delay_ms) > Duration::from_secs(self.max_delay_secs) {
            return Err(ConfigError::config(format!(
                "reconnect.initial_delay_ms ({}) cannot exceed max_delay_secs ({})",
                self.initial_delay_ms, self.max_delay_secs
            )));
        }

        Ok(())
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}
