//! Axum extractor for the caller's tenant session

use crate::{ApiError, AppState};

use wp_auth::{TenantContext, bearer_token};
use wp_core::{ActorId, TenantId};

use std::future::Future;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

pub const TENANT_HEADER: &str = "X-Tenant-Id";
pub const ACTOR_HEADER: &str = "X-Actor-Id";

/// Tenant and actor every sync request is scoped to.
///
/// With a JWT validator configured the session comes from the bearer token.
/// Without one (desktop/dev mode) it is read from `X-Tenant-Id` and
/// `X-Actor-Id`, falling back to the configured defaults.
pub struct Session(pub TenantContext);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let headers = &parts.headers;

            let Some(validator) = state.jwt_validator.as_ref() else {
                return Ok(Session(anonymous_session(headers, state)));
            };

            let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
            let token = bearer_token(header)?;
            let claims = validator.validate(token)?;
            let context = TenantContext::from_claims(claims);

            log::debug!(
                "Authenticated actor {} for tenant {}",
                context.actor_id,
                context.tenant_id
            );
            Ok(Session(context))
        }
    }
}

fn anonymous_session(headers: &HeaderMap, state: &AppState) -> TenantContext {
    let tenant_id = header_value(headers, TENANT_HEADER)
        .map(TenantId::new)
        .unwrap_or_else(|| state.default_tenant_id.clone());
    let actor_id = header_value(headers, ACTOR_HEADER)
        .map(ActorId::new)
        .unwrap_or_else(|| state.default_actor_id.clone());

    log::debug!(
        "Using unauthenticated session: tenant={}, actor={}",
        tenant_id,
        actor_id
    );
    TenantContext::new(tenant_id, actor_id)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
