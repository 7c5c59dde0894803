use crate::Claims;

use wp_core::{ActorId, TenantId};

/// Validated session identity available to handlers.
/// Every sync operation a request performs is scoped to `tenant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub actor_id: ActorId,
    pub roles: Vec<String>,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId, actor_id: ActorId) -> Self {
        Self {
            tenant_id,
            actor_id,
            roles: Vec::new(),
        }
    }

    /// Claims must already be validated.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            tenant_id: TenantId::new(claims.tenant_id.trim()),
            actor_id: ActorId::new(claims.sub.trim()),
            roles: claims.roles,
        }
    }

    pub fn owns(&self, tenant_id: &TenantId) -> bool {
        &self.tenant_id == tenant_id
    }
}
