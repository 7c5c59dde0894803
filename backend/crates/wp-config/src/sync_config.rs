use crate::{BackendKind, ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Retention count constraints
pub const MIN_RETENTION_COUNT: usize = 1;
pub const MAX_RETENTION_COUNT: usize = 100_000;
pub const DEFAULT_RETENTION_COUNT: usize = 1000;

// Retention window constraints (seconds)
pub const MIN_RETENTION_WINDOW_SECS: u64 = 60;
pub const MAX_RETENTION_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;
pub const DEFAULT_RETENTION_WINDOW_SECS: u64 = 24 * 60 * 60;

// Catch-up cap constraints
pub const MIN_CATCH_UP_CAP: usize = 1;
pub const MAX_CATCH_UP_CAP: usize = 100_000;
pub const DEFAULT_CATCH_UP_CAP: usize = 1000;

// Poll interval constraints (milliseconds)
pub const MIN_POLL_INTERVAL_MS: u64 = 50;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// Live channel capacity constraints
pub const MIN_CHANNEL_CAPACITY: usize = 1;
pub const MAX_CHANNEL_CAPACITY: usize = 10_000;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// Retention sweep interval constraints (seconds)
pub const MIN_TRIM_INTERVAL_SECS: u64 = 1;
pub const MAX_TRIM_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_TRIM_INTERVAL_SECS: u64 = 60;

// SSE keep-alive constraints (seconds)
pub const MIN_KEEP_ALIVE_SECS: u64 = 1;
pub const MAX_KEEP_ALIVE_SECS: u64 = 300;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

/// Bounded log, catch-up and live delivery settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub backend: BackendKind,
    /// Maximum envelopes retained per tenant
    pub retention_count: usize,
    /// Envelopes older than this are evicted
    pub retention_window_secs: u64,
    /// Maximum envelopes replayed on reconnect before the cursor is stale
    pub catch_up_cap: usize,
    /// Cross-process poll interval for the sqlite backend
    pub poll_interval_ms: u64,
    /// Per-tenant live channel capacity
    pub channel_capacity: usize,
    /// Background retention sweep interval
    pub trim_interval_secs: u64,
    pub keep_alive_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            retention_count: DEFAULT_RETENTION_COUNT,
            retention_window_secs: DEFAULT_RETENTION_WINDOW_SECS,
            catch_up_cap: DEFAULT_CATCH_UP_CAP,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            trim_interval_secs: DEFAULT_TRIM_INTERVAL_SECS,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range(
            "sync.retention_count",
            self.retention_count,
            MIN_RETENTION_COUNT,
            MAX_RETENTION_COUNT,
        )?;
        check_range(
            "sync.retention_window_secs",
            self.retention_window_secs,
            MIN_RETENTION_WINDOW_SECS,
            MAX_RETENTION_WINDOW_SECS,
        )?;
        check_range(
            "sync.catch_up_cap",
            self.catch_up_cap,
            MIN_CATCH_UP_CAP,
            MAX_CATCH_UP_CAP,
        )?;
        check_range(
            "sync.poll_interval_ms",
            self.poll_interval_ms,
            MIN_POLL_INTERVAL_MS,
            MAX_POLL_INTERVAL_MS,
        )?;
        check_range(
            "sync.channel_capacity",
            self.channel_capacity,
            MIN_CHANNEL_CAPACITY,
            MAX_CHANNEL_CAPACITY,
        )?;
        check_range(
            "sync.trim_interval_secs",
            self.trim_interval_secs,
            MIN_TRIM_INTERVAL_SECS,
            MAX_TRIM_INTERVAL_SECS,
        )?;
        check_range(
            "sync.keep_alive_secs",
            self.keep_alive_secs,
            MIN_KEEP_ALIVE_SECS,
            MAX_KEEP_ALIVE_SECS,
        )?;

        Ok(())
    }

    pub fn retention_window(&self) -> Duration {
        Duration::from_secs(self.retention_window_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn trim_interval(&self) -> Duration {
        Duration::from_secs(self.trim_interval_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

#[track_caller]
fn check_range<T>(field: &str, value: T, min: T, max: T) -> ConfigErrorResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::sync(format!(
            "{field} must be {min}-{max}, got {value}"
        )));
    }
    Ok(())
}
