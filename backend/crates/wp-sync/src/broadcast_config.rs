use wp_config::SyncConfig;

use std::time::Duration;

/// Live channel and bounded log settings shared by every backend
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Per-tenant live channel capacity; slower receivers observe a lag
    pub channel_capacity: usize,
    /// Maximum envelopes retained per tenant
    pub retention_count: usize,
    /// Envelopes older than this are evicted
    pub retention_window: Duration,
    /// Maximum envelopes replayed on (re)connect
    pub catch_up_cap: usize,
    /// Cross-process poll interval (sqlite backend only)
    pub poll_interval: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for BroadcastConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            retention_count: config.retention_count,
            retention_window: config.retention_window(),
            catch_up_cap: config.catch_up_cap,
            poll_interval: config.poll_interval(),
        }
    }
}

impl BroadcastConfig {
    pub(crate) fn retention_window_millis(&self) -> i64 {
        i64::try_from(self.retention_window.as_millis()).unwrap_or(i64::MAX)
    }
}
