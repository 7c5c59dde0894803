use crate::{LiveFeed, LogPage, Result as SyncErrorResult, SyncError};

use wp_core::{Cursor, Envelope, TenantId};

use async_trait::async_trait;

/// Fan-out and bounded-log storage for change envelopes.
///
/// Every operation is scoped by tenant. Implementations must reject an
/// envelope whose `tenant_id` differs from the tenant argument.
#[async_trait]
pub trait BroadcastBackend: Send + Sync {
    /// Push an envelope to everyone attached to the tenant right now.
    /// Returns the number of in-process receivers reached.
    async fn publish_live(&self, tenant_id: &TenantId, envelope: &Envelope)
    -> SyncErrorResult<usize>;

    /// Append to the tenant's bounded log. The returned envelope carries the
    /// final log timestamp, strictly greater than anything already retained.
    async fn append_log(&self, tenant_id: &TenantId, envelope: Envelope)
    -> SyncErrorResult<Envelope>;

    /// Envelopes strictly after `cursor`, oldest first, at most `limit`
    async fn read_log_since(
        &self,
        tenant_id: &TenantId,
        cursor: Cursor,
        limit: usize,
    ) -> SyncErrorResult<LogPage>;

    /// Attach to the tenant's live delivery
    async fn attach_live(&self, tenant_id: &TenantId) -> SyncErrorResult<LiveFeed>;

    /// Position of the newest envelope in the tenant's log
    async fn head(&self, tenant_id: &TenantId) -> SyncErrorResult<Cursor>;

    /// Apply retention to one tenant. Returns the number of evicted envelopes.
    async fn trim(&self, tenant_id: &TenantId) -> SyncErrorResult<usize>;

    /// Apply retention to every tenant
    async fn trim_all(&self) -> SyncErrorResult<usize>;

    fn name(&self) -> &'static str;
}

/// Reject an envelope that does not belong to `expected`
#[track_caller]
pub fn ensure_tenant(expected: &TenantId, envelope: &Envelope) -> SyncErrorResult<()> {
    if envelope.belongs_to(expected) {
        Ok(())
    } else {
        Err(SyncError::tenant_mismatch(expected, envelope.tenant_id()))
    }
}
