use crate::{AppState, health, list_changes, sync_stream};

use axum::{Router, routing::get};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
///
/// `max_connections` bounds concurrent catch-up requests; open streams are
/// bounded separately by `AppState::stream_slots`.
pub fn build_router(state: AppState, max_connections: usize) -> Router {
    let catch_up = Router::new()
        .route("/sync/changes", get(list_changes))
        .layer(ConcurrencyLimitLayer::new(max_connections));

    Router::new()
        .route("/sync/stream", get(sync_stream))
        .merge(catch_up)
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
