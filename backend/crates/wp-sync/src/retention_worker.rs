use crate::{BroadcastBackend, Metrics, ShutdownGuard};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Periodically apply retention to every tenant's log until shutdown
pub fn spawn_retention_worker(
    backend: Arc<dyn BroadcastBackend>,
    interval: Duration,
    metrics: Metrics,
    mut shutdown: ShutdownGuard,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        log::info!(
            "Retention worker started for {} backend (every {:?})",
            backend.name(),
            interval
        );

        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    log::info!("Retention worker stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match backend.trim_all().await {
                        Ok(0) => {}
                        Ok(removed) => {
                            metrics.envelopes_trimmed(removed);
                            log::debug!("Retention removed {} envelopes", removed);
                        }
                        Err(e) => log::warn!("Retention pass failed: {}", e),
                    }
                }
            }
        }
    })
}
