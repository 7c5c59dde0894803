use crate::{SyncQuery, parse_cursor};

use wp_auth::TenantContext;
use wp_core::{ActorId, Cursor, TenantId};

fn session() -> TenantContext {
    TenantContext::new(TenantId::new("wedding-42"), ActorId::new("session-7"))
}

#[test]
fn test_cursor_parses_since() {
    let query = SyncQuery {
        since: Some("1700000000123".into()),
        ..Default::default()
    };

    assert_eq!(
        query.cursor().unwrap(),
        Some(Cursor::from_millis(1_700_000_000_123))
    );
}

#[test]
fn test_blank_since_is_absent() {
    let query = SyncQuery {
        since: Some("  ".into()),
        ..Default::default()
    };

    assert_eq!(query.cursor().unwrap(), None);
    assert_eq!(parse_cursor(None).unwrap(), None);
}

#[test]
fn test_invalid_since_is_validation_error() {
    for raw in ["abc", "-5", "12.5"] {
        let error = parse_cursor(Some(raw)).unwrap_err();
        assert_eq!(error.code(), "VALIDATION_ERROR");
    }
}

#[test]
fn test_matching_or_absent_tenant_is_accepted() {
    let matching = SyncQuery {
        tenant_id: Some("wedding-42".into()),
        ..Default::default()
    };

    assert!(matching.check_tenant(&session()).is_ok());
    assert!(SyncQuery::default().check_tenant(&session()).is_ok());
}

#[test]
fn test_other_tenant_is_rejected() {
    let query = SyncQuery {
        tenant_id: Some("wedding-99".into()),
        ..Default::default()
    };

    let error = query.check_tenant(&session()).unwrap_err();

    assert_eq!(error.code(), "TENANT_MISMATCH");
    assert_eq!(error.status(), axum::http::StatusCode::FORBIDDEN);
}
