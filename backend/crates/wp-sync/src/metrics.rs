use metrics::{counter, gauge, histogram};

/// Metrics collector for publish and subscription paths
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "wp_sync" }
    }

    /// Record an envelope appended and pushed live
    pub fn envelope_published(&self, module: &str, receivers: usize) {
        counter!(format!("{}.envelopes.published", self.prefix)).increment(1);
        counter!(format!("{}.envelopes.published.{}", self.prefix, module)).increment(1);
        gauge!(format!("{}.broadcast.receivers", self.prefix)).set(receivers as f64);
    }

    /// Record a publish that did not reach the backend
    pub fn publish_failed(&self, error_code: &str) {
        counter!(format!("{}.publish.failed", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_code)).increment(1);
    }

    pub fn stream_opened(&self) {
        counter!(format!("{}.streams.opened", self.prefix)).increment(1);
        gauge!(format!("{}.streams.active", self.prefix)).increment(1.0);
    }

    pub fn stream_closed(&self) {
        counter!(format!("{}.streams.closed", self.prefix)).increment(1);
        gauge!(format!("{}.streams.active", self.prefix)).decrement(1.0);
    }

    /// Record envelopes replayed from the log on open
    pub fn catch_up_replayed(&self, count: usize) {
        counter!(format!("{}.catch_up.replayed", self.prefix)).increment(count as u64);
    }

    pub fn stale_cursor(&self) {
        counter!(format!("{}.cursors.stale", self.prefix)).increment(1);
    }

    pub fn duplicate_dropped(&self) {
        counter!(format!("{}.live.duplicates", self.prefix)).increment(1);
    }

    pub fn self_echo_suppressed(&self) {
        counter!(format!("{}.live.self_echo", self.prefix)).increment(1);
    }

    pub fn live_lagged(&self, missed: u64) {
        counter!(format!("{}.live.lagged", self.prefix)).increment(missed);
    }

    pub fn gap_fill(&self, count: usize) {
        counter!(format!("{}.live.gap_fills", self.prefix)).increment(1);
        counter!(format!("{}.live.gap_filled", self.prefix)).increment(count as u64);
    }

    pub fn envelopes_trimmed(&self, count: usize) {
        counter!(format!("{}.log.trimmed", self.prefix)).increment(count as u64);
    }

    pub fn tenant_mismatch(&self) {
        counter!(format!("{}.errors.TENANT_MISMATCH", self.prefix)).increment(1);
    }

    /// Record latency of a named operation
    pub fn operation_latency(&self, operation: &str, duration: std::time::Duration) {
        histogram!(format!("{}.{}.latency_ms", self.prefix, operation))
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
