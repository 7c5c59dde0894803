use crate::{ApiError, ApiResult, AppState, Session, SyncQuery};

use wp_core::{Cursor, Envelope};

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

/// One page of catch-up for clients that poll instead of streaming
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesResponse {
    pub envelopes: Vec<Envelope>,
    /// Pass back as `since` on the next request
    pub cursor: Cursor,
    pub has_more: bool,
}

/// GET /sync/changes?since=<cursor>&limit=<n>
pub async fn list_changes(
    State(state): State<AppState>,
    Session(session): Session,
    Query(query): Query<SyncQuery>,
) -> ApiResult<Json<ChangesResponse>> {
    query.check_tenant(&session)?;
    let since = query.cursor()?;

    let limit = query.limit.unwrap_or(state.server.catch_up_cap());
    if limit == 0 {
        return Err(ApiError::validation("limit", "limit must be at least 1"));
    }

    let page = state
        .server
        .catch_up(&session.tenant_id, &session.actor_id, since, limit)
        .await?;

    log::debug!(
        "Catch-up for tenant {} since {:?}: {} envelopes, more={}",
        session.tenant_id,
        since,
        page.envelopes.len(),
        page.has_more
    );

    Ok(Json(ChangesResponse {
        envelopes: page.envelopes,
        cursor: page.cursor,
        has_more: page.has_more,
    }))
}
