use crate::Session;
use crate::tests::{TEST_JWT_SECRET, test_state};

use wp_auth::Claims;
use wp_core::{ActorId, TenantId};

use axum::{body::Body, extract::FromRequestParts, http::Request};
use jsonwebtoken::{EncodingKey, Header, encode};

fn token(tenant_id: &str, sub: &str, secret: &[u8]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        tenant_id: tenant_id.to_string(),
        exp: now + 3600,
        iat: now,
        roles: vec!["planner".to_string()],
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

async fn extract(request: Request<Body>, jwt: bool) -> Result<Session, crate::ApiError> {
    let state = test_state(jwt);
    let (mut parts, _body) = request.into_parts();
    Session::from_request_parts(&mut parts, &state).await
}

#[tokio::test]
async fn test_extractor_uses_identity_headers_without_auth() {
    let request = Request::builder()
        .header("X-Tenant-Id", "wedding-42")
        .header("X-Actor-Id", "session-7")
        .body(Body::empty())
        .unwrap();

    let Session(session) = extract(request, false).await.unwrap();

    assert_eq!(session.tenant_id, TenantId::new("wedding-42"));
    assert_eq!(session.actor_id, ActorId::new("session-7"));
}

#[tokio::test]
async fn test_extractor_falls_back_to_defaults_without_auth() {
    let request = Request::builder()
        .header("X-Tenant-Id", "   ")
        .body(Body::empty())
        .unwrap();

    let Session(session) = extract(request, false).await.unwrap();

    assert_eq!(session.tenant_id, TenantId::new("local"));
    assert_eq!(session.actor_id, ActorId::new("local-user"));
}

#[tokio::test]
async fn test_extractor_reads_session_from_valid_token() {
    let request = Request::builder()
        .header(
            "Authorization",
            format!("Bearer {}", token("wedding-42", "session-7", TEST_JWT_SECRET)),
        )
        // ignored once a token is required
        .header("X-Tenant-Id", "wedding-99")
        .body(Body::empty())
        .unwrap();

    let Session(session) = extract(request, true).await.unwrap();

    assert_eq!(session.tenant_id, TenantId::new("wedding-42"));
    assert_eq!(session.actor_id, ActorId::new("session-7"));
    assert_eq!(session.roles, vec!["planner".to_string()]);
}

#[tokio::test]
async fn test_extractor_rejects_missing_header_when_auth_enabled() {
    let request = Request::builder().body(Body::empty()).unwrap();

    let error = extract(request, true).await.err().unwrap();

    assert_eq!(error.code(), "MISSING_AUTH_HEADER");
    assert_eq!(error.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_extractor_rejects_token_signed_with_other_secret() {
    let request = Request::builder()
        .header(
            "Authorization",
            format!(
                "Bearer {}",
                token("wedding-42", "session-7", b"some-other-secret-that-is-32-bytes-long")
            ),
        )
        .body(Body::empty())
        .unwrap();

    let error = extract(request, true).await.err().unwrap();

    assert_eq!(error.code(), "INVALID_TOKEN");
}
