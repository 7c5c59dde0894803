use crate::Metrics;

use std::time::Instant;

/// Helper for timing operations
pub struct MetricsTimer {
    start: Instant,
    operation: &'static str,
    metrics: Metrics,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
            metrics,
        }
    }

    /// Record elapsed time
    pub fn finish(self) {
        let duration = self.start.elapsed();
        self.metrics.operation_latency(self.operation, duration);
    }
}
