use crate::ApiError;

use wp_auth::AuthError;
use wp_core::{CoreError, Cursor, TenantId};
use wp_sync::SyncError;

use std::panic::Location;

use axum::response::{IntoResponse, Response};
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_stale_cursor_returns_410_with_cursor() {
    let error = ApiError::from(SyncError::stale_cursor(
        Cursor::from_millis(42),
        "history trimmed",
    ));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::GONE);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "STALE_CURSOR");
    assert_eq!(json["error"]["message"], "history trimmed");
    assert_eq!(json["error"]["cursor"], 42);
}

#[tokio::test]
async fn test_tenant_mismatch_returns_403() {
    let error = ApiError::from(SyncError::tenant_mismatch(
        &TenantId::new("wedding-a"),
        &TenantId::new("wedding-b"),
    ));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "TENANT_MISMATCH");
    assert!(json["error"]["message"].as_str().unwrap().contains("wedding-b"));
}

#[tokio::test]
async fn test_broadcast_unavailable_returns_503() {
    let error = ApiError::from(SyncError::broadcast_unavailable("database is locked"));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "BROADCAST_UNAVAILABLE");
}

#[tokio::test]
async fn test_validation_error_returns_400_with_field() {
    let error = ApiError::from(SyncError::from(CoreError::validation(
        "entity_id",
        "entity_id cannot be empty",
    )));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "entity_id");
    assert!(json["error"].get("cursor").is_none());
}

#[tokio::test]
async fn test_invalid_cursor_maps_to_since_field() {
    let error = ApiError::from(CoreError::InvalidCursor {
        value: "yesterday".into(),
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["field"], "since");
    assert!(json["error"]["message"].as_str().unwrap().contains("yesterday"));
}

#[tokio::test]
async fn test_auth_errors_return_401_with_auth_code() {
    let error = ApiError::from(AuthError::TokenExpired {
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_internal_error_hides_location() {
    let error = ApiError::from(SyncError::internal("poller task panicked"));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"]["message"], "poller task panicked");
}

#[test]
fn test_overloaded_is_retryable_service_unavailable() {
    let error = ApiError::Overloaded {
        message: "too many open streams".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error.code(), "SERVICE_UNAVAILABLE");
}
