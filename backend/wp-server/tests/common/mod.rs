#![allow(dead_code)]

//! Test infrastructure for wp-server API tests

use wp_server::{AppState, build_router};

use wp_auth::{Claims, JwtValidator, TenantContext};
use wp_config::Config;
use wp_core::{ActorId, ChangeKind, Cursor, EnvelopeDraft, SyncModule, TenantId};
use wp_sync::{BroadcastConfig, InMemoryBackend, ManualClock, ShutdownCoordinator};

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::net::TcpListener;

pub const START: i64 = 1_700_000_000_000;

/// HS256 requires at least 32 bytes
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

pub struct TestApp {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub backend: Arc<InMemoryBackend>,
    pub max_connections: usize,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default(), false)
    }

    pub fn with_auth() -> Self {
        Self::with_config(Config::default(), true)
    }

    pub fn with_config(config: Config, jwt: bool) -> Self {
        let clock = Arc::new(ManualClock::new(Cursor::from_millis(START)));
        let backend = Arc::new(InMemoryBackend::new(
            BroadcastConfig::from(&config.sync),
            clock.clone(),
        ));
        let jwt_validator = jwt.then(|| Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)));
        let state = AppState::new(
            &config,
            backend.clone(),
            clock.clone(),
            jwt_validator,
            ShutdownCoordinator::new(),
        );

        Self {
            state,
            clock,
            backend,
            max_connections: config.server.max_connections,
        }
    }

    /// In-process server for request/response endpoints
    pub fn test_server(&self) -> TestServer {
        TestServer::builder()
            .build(build_router(self.state.clone(), self.max_connections))
            .expect("Failed to create test server")
    }

    /// Serve on an ephemeral port; returns the base URL
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let app = build_router(self.state.clone(), self.max_connections);
        let shutdown = self.state.shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown.subscribe_guard().wait().await;
                })
                .await
                .expect("Test server failed");
        });

        format!("http://{}", addr)
    }

    pub async fn publish(&self, draft: EnvelopeDraft) -> wp_core::Envelope {
        let session = TenantContext::new(draft.tenant_id.clone(), draft.actor_id.clone());
        self.state
            .publisher
            .publish(&session, draft)
            .await
            .expect("Failed to publish")
    }
}

/// A guest added to a wedding, as the guests handler publishes it
pub fn guest_insert(tenant: &str, actor: &str, guest_id: &str) -> EnvelopeDraft {
    EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        guest_id,
        TenantId::new(tenant),
        ActorId::new(actor),
    )
    .with_targets(["guests.list", "wedding.guest_count"])
}

pub fn create_test_token(tenant_id: &str, sub: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        tenant_id: tenant_id.to_string(),
        exp: now + 3600,
        iat: now,
        roles: Vec::new(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}
