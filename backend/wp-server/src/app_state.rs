use wp_auth::JwtValidator;
use wp_config::Config;
use wp_core::{ActorId, TenantId};
use wp_sync::{
    BroadcastBackend, ChangePublisher, Clock, RetryConfig, ShutdownCoordinator,
    SubscriptionServer,
};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub server: SubscriptionServer,
    /// Mutation handlers publish through this after their write commits
    pub publisher: Arc<ChangePublisher>,
    /// `None` runs without authentication (desktop/dev mode)
    pub jwt_validator: Option<Arc<JwtValidator>>,
    pub default_tenant_id: TenantId,
    pub default_actor_id: ActorId,
    pub keep_alive: Duration,
    /// One permit per open SSE stream
    pub stream_slots: Arc<Semaphore>,
    pub shutdown: ShutdownCoordinator,
}

impl AppState {
    pub fn new(
        config: &Config,
        backend: Arc<dyn BroadcastBackend>,
        clock: Arc<dyn Clock>,
        jwt_validator: Option<Arc<JwtValidator>>,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let publisher = ChangePublisher::new(
            Arc::clone(&backend),
            clock,
            RetryConfig::from(&config.retry),
        );

        Self {
            server: SubscriptionServer::new(backend, config.sync.catch_up_cap),
            publisher: Arc::new(publisher),
            jwt_validator,
            default_tenant_id: TenantId::new(config.auth.default_tenant_id.trim()),
            default_actor_id: ActorId::new(config.auth.default_actor_id.trim()),
            keep_alive: Duration::from_secs(config.sync.keep_alive_secs),
            stream_slots: Arc::new(Semaphore::new(config.server.max_streams)),
            shutdown,
        }
    }
}
