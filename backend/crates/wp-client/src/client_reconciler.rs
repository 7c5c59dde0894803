use crate::{
    Backoff, ClientError, ClientResult, CursorStore, OpenedFeed, QueryInvalidator, StreamSource,
};

use wp_core::{ActorId, Cursor, Envelope, TenantId};
use wp_sync::ShutdownGuard;

use std::panic::Location;

use error_location::ErrorLocation;
use futures::StreamExt;

/// How one stream session ended
enum SessionEnd {
    Shutdown,
    Failed(ClientError),
}

/// Applies a tenant's change stream to the local query cache.
///
/// Keeps the high-water mark in a `CursorStore` so reconnects (and restarts,
/// with a durable store) resume without gaps.
pub struct ClientReconciler<S, C, Q> {
    source: S,
    cursor_store: C,
    invalidator: Q,
    tenant_id: TenantId,
    actor_id: ActorId,
    backoff: Backoff,
    last_seen: Option<Cursor>,
}

impl<S, C, Q> ClientReconciler<S, C, Q>
where
    S: StreamSource,
    C: CursorStore,
    Q: QueryInvalidator,
{
    pub fn new(
        source: S,
        cursor_store: C,
        invalidator: Q,
        tenant_id: TenantId,
        actor_id: ActorId,
        backoff: Backoff,
    ) -> Self {
        Self {
            source,
            cursor_store,
            invalidator,
            tenant_id,
            actor_id,
            backoff,
            last_seen: None,
        }
    }

    pub fn last_seen(&self) -> Option<Cursor> {
        self.last_seen
    }

    /// Restore the high-water mark from the cursor store
    pub async fn load_cursor(&mut self) -> ClientResult<Option<Cursor>> {
        self.last_seen = self.cursor_store.load().await?;
        Ok(self.last_seen)
    }

    /// Apply one envelope. Returns `false` when it was already applied.
    pub async fn process_envelope(&mut self, envelope: &Envelope) -> ClientResult<bool> {
        if !envelope.belongs_to(&self.tenant_id) {
            return Err(ClientError::TenantMismatch {
                message: format!(
                    "expected {}, got {}",
                    self.tenant_id,
                    envelope.tenant_id()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let cursor = envelope.cursor();
        if self.last_seen.is_some_and(|seen| cursor <= seen) {
            return Ok(false);
        }

        if !envelope.is_authored_by(&self.actor_id) {
            for target in envelope.invalidation_targets() {
                self.invalidator.invalidate(target);
            }
        }

        self.cursor_store.save(cursor).await?;
        self.last_seen = Some(cursor);
        Ok(true)
    }

    /// Drop the cursor and everything cached; the next open starts from now
    pub async fn reset(&mut self) -> ClientResult<()> {
        self.cursor_store.clear().await?;
        self.last_seen = None;
        self.invalidator.invalidate_all();
        Ok(())
    }

    /// Follow the stream until shutdown.
    ///
    /// Reconnects with backoff on transport failures and refreshes fully on a
    /// stale cursor. Returns an error only for failures a reconnect cannot fix.
    pub async fn run_until(&mut self, mut shutdown: ShutdownGuard) -> ClientResult<()> {
        if self.last_seen.is_none() {
            self.load_cursor().await?;
        }

        loop {
            if shutdown.poll_shutdown() {
                return Ok(());
            }

            let opened = tokio::select! {
                _ = shutdown.wait() => return Ok(()),
                opened = self.source.open(self.last_seen) => opened,
            };

            let error = match opened {
                Ok(feed) => {
                    self.backoff.reset();
                    match self.consume(feed, &mut shutdown).await {
                        SessionEnd::Shutdown => return Ok(()),
                        SessionEnd::Failed(e) => e,
                    }
                }
                Err(e) => e,
            };

            match error {
                ClientError::StaleCursor { .. } => {
                    log::info!(
                        "Cursor {:?} for tenant {} is stale, refreshing everything",
                        self.last_seen,
                        self.tenant_id
                    );
                    self.reset().await?;
                }
                e if e.is_retryable() => {
                    let delay = self.backoff.next_delay();
                    log::warn!(
                        "Stream for tenant {} interrupted: {}. Reconnecting in {:?} (attempt {})",
                        self.tenant_id,
                        e,
                        delay,
                        self.backoff.attempts()
                    );
                    tokio::select! {
                        _ = shutdown.wait() => return Ok(()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                e => {
                    log::error!("Stream for tenant {} failed: {}", self.tenant_id, e);
                    return Err(e);
                }
            }
        }
    }

    /// Store the server's starting cursor when none is held yet
    async fn adopt_start(&mut self, start: Option<Cursor>) -> ClientResult<()> {
        if let (None, Some(start)) = (self.last_seen, start) {
            self.cursor_store.save(start).await?;
            self.last_seen = Some(start);
        }
        Ok(())
    }

    async fn consume(&mut self, mut feed: OpenedFeed, shutdown: &mut ShutdownGuard) -> SessionEnd {
        if let Err(e) = self.adopt_start(feed.start).await {
            return SessionEnd::Failed(e);
        }
        log::info!(
            "Following tenant {} from cursor {:?}",
            self.tenant_id,
            self.last_seen
        );

        loop {
            let item = tokio::select! {
                _ = shutdown.wait() => return SessionEnd::Shutdown,
                item = feed.next() => item,
            };

            match item {
                Some(Ok(envelope)) => {
                    if let Err(e) = self.process_envelope(&envelope).await {
                        return SessionEnd::Failed(e);
                    }
                }
                Some(Err(e)) => return SessionEnd::Failed(e),
                None => return SessionEnd::Failed(ClientError::disconnected("stream ended")),
            }
        }
    }
}
