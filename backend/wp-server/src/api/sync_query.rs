use crate::{ApiError, ApiResult};

use wp_auth::TenantContext;
use wp_core::{Cursor, TenantId};

use serde::Deserialize;

/// Query parameters shared by `/sync/stream` and `/sync/changes`
#[derive(Debug, Default, Deserialize)]
pub struct SyncQuery {
    /// Last timestamp the client processed
    pub since: Option<String>,
    pub limit: Option<usize>,
    /// Optional; must match the session tenant when present
    pub tenant_id: Option<String>,
}

impl SyncQuery {
    /// Parse `since`; blank is the same as absent
    #[track_caller]
    pub fn cursor(&self) -> ApiResult<Option<Cursor>> {
        parse_cursor(self.since.as_deref())
    }

    /// Reject a `tenant_id` that names another tenant
    #[track_caller]
    pub fn check_tenant(&self, session: &TenantContext) -> ApiResult<()> {
        match self.tenant_id.as_deref().map(str::trim) {
            Some(requested) if !requested.is_empty() => {
                if session.owns(&TenantId::new(requested)) {
                    Ok(())
                } else {
                    Err(ApiError::tenant_mismatch(format!(
                        "session tenant {} cannot access tenant {}",
                        session.tenant_id, requested
                    )))
                }
            }
            _ => Ok(()),
        }
    }
}

#[track_caller]
pub fn parse_cursor(value: Option<&str>) -> ApiResult<Option<Cursor>> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(Some(raw.parse::<Cursor>()?)),
        _ => Ok(None),
    }
}
