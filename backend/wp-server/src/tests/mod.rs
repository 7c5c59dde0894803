mod api;

use crate::AppState;

use wp_auth::JwtValidator;
use wp_config::Config;
use wp_core::Cursor;
use wp_sync::{BroadcastConfig, Clock, InMemoryBackend, ManualClock, ShutdownCoordinator};

use std::sync::Arc;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-unit-tests-at-least-32-bytes";

/// State over an in-memory backend; `jwt` enables authentication
pub fn test_state(jwt: bool) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Cursor::from_millis(1_700_000_000_000)));
    let backend = Arc::new(InMemoryBackend::new(
        BroadcastConfig::default(),
        Arc::clone(&clock),
    ));
    let jwt_validator = jwt.then(|| Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)));

    AppState::new(
        &Config::default(),
        backend,
        clock,
        jwt_validator,
        ShutdownCoordinator::new(),
    )
}
