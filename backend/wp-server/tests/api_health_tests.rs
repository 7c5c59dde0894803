mod common;

use common::TestApp;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_backend_and_auth_mode() {
    let server = TestApp::new().test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["broadcast_backend"], "memory");
    assert_eq!(body["components"]["auth"], "disabled");
}

#[tokio::test]
async fn test_liveness_always_ok() {
    let server = TestApp::new().test_server();

    server.get("/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_readiness_flips_once_shutdown_begins() {
    let app = TestApp::new();
    let server = app.test_server();

    server.get("/ready").await.assert_status_ok();

    app.state.shutdown.shutdown();

    server
        .get("/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
