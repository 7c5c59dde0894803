use wp_core::{Cursor, Envelope, TenantId};
use wp_sync::{BroadcastBackend, LiveFeed, LogPage, Result as SyncResult, SyncError};

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

/// Backend whose log is always unreachable
#[derive(Default)]
pub struct FailingBackend {
    pub append_attempts: AtomicUsize,
}

impl FailingBackend {
    pub fn attempts(&self) -> usize {
        self.append_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BroadcastBackend for FailingBackend {
    async fn publish_live(&self, _tenant_id: &TenantId, _envelope: &Envelope) -> SyncResult<usize> {
        Err(SyncError::broadcast_unavailable("live channel down"))
    }

    async fn append_log(&self, _tenant_id: &TenantId, _envelope: Envelope) -> SyncResult<Envelope> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::broadcast_unavailable("log down"))
    }

    async fn read_log_since(
        &self,
        _tenant_id: &TenantId,
        _cursor: Cursor,
        _limit: usize,
    ) -> SyncResult<LogPage> {
        Err(SyncError::broadcast_unavailable("log down"))
    }

    async fn attach_live(&self, _tenant_id: &TenantId) -> SyncResult<LiveFeed> {
        Err(SyncError::broadcast_unavailable("live channel down"))
    }

    async fn head(&self, _tenant_id: &TenantId) -> SyncResult<Cursor> {
        Err(SyncError::broadcast_unavailable("log down"))
    }

    async fn trim(&self, _tenant_id: &TenantId) -> SyncResult<usize> {
        Ok(0)
    }

    async fn trim_all(&self) -> SyncResult<usize> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
