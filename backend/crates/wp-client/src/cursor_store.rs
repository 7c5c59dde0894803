use crate::ClientResult;

use wp_core::Cursor;

use std::sync::Arc;

use async_trait::async_trait;

/// Durable home for the reconciler's high-water mark
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<Cursor>>;

    async fn save(&self, cursor: Cursor) -> ClientResult<()>;

    /// Forget the cursor, e.g. after it went stale
    async fn clear(&self) -> ClientResult<()>;
}

#[async_trait]
impl<T: CursorStore + ?Sized> CursorStore for Arc<T> {
    async fn load(&self) -> ClientResult<Option<Cursor>> {
        (**self).load().await
    }

    async fn save(&self, cursor: Cursor) -> ClientResult<()> {
        (**self).save(cursor).await
    }

    async fn clear(&self) -> ClientResult<()> {
        (**self).clear().await
    }
}
