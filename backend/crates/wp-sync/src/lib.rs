pub mod broadcast_backend;
pub mod broadcast_config;
pub mod change_publisher;
pub mod clock;
pub mod connection_id;
pub mod error;
pub mod live_feed;
pub mod log_page;
pub mod memory_backend;
pub mod metrics;
pub mod metrics_timer;
pub mod retention_worker;
pub mod retry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod sqlite_backend;
pub mod subscription;
pub mod subscription_server;
pub mod tenant_broadcaster;

pub use broadcast_backend::{BroadcastBackend, ensure_tenant};
pub use broadcast_config::BroadcastConfig;
pub use change_publisher::ChangePublisher;
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection_id::ConnectionId;
pub use error::{Result, SyncError};
pub use live_feed::{LiveEvent, LiveFeed};
pub use log_page::LogPage;
pub use memory_backend::InMemoryBackend;
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use retention_worker::spawn_retention_worker;
pub use retry::{IsRetryable, RetryConfig, with_retry};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use sqlite_backend::SqliteBackend;
pub use subscription::Subscription;
pub use subscription_server::{CatchUpPage, EnvelopeStream, OpenedStream, SubscriptionServer};
pub use tenant_broadcaster::{TenantBroadcaster, TenantSubscription};

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one subscription stream.
/// All log entries emitted while opening the stream carry these fields.
pub fn create_stream_span(subscription: &Subscription) -> tracing::Span {
    info_span!(
        "sync_stream",
        tenant_id = %subscription.tenant_id,
        actor_id = %subscription.actor_id,
        connection_id = %subscription.connection_id,
    )
}
