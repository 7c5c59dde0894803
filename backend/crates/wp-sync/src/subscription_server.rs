use crate::{
    BroadcastBackend, LiveEvent, LiveFeed, Metrics, Result as SyncErrorResult, Subscription,
    SyncError, create_stream_span, ensure_tenant,
};

use wp_core::{ActorId, Cursor, Envelope, EnvelopeId, TenantId};

use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt, stream};
use tracing::Instrument;

/// Envelopes for one subscriber: catch-up first, then live, in timestamp order
pub type EnvelopeStream = Pin<Box<dyn Stream<Item = SyncErrorResult<Envelope>> + Send>>;

/// A freshly opened stream and the cursor it starts after.
///
/// `start` is `since` when one was supplied, otherwise the tenant's head at
/// open time. A client that stores it can resume without gaps even if the
/// transport drops before the first envelope arrives.
pub struct OpenedStream {
    pub start: Cursor,
    pub envelopes: EnvelopeStream,
}

/// One page of the polling catch-up variant
#[derive(Debug, Clone)]
pub struct CatchUpPage {
    pub envelopes: Vec<Envelope>,
    /// Resume point for the next request
    pub cursor: Cursor,
    pub has_more: bool,
}

/// Opens per-subscriber envelope streams over a broadcast backend
#[derive(Clone)]
pub struct SubscriptionServer {
    backend: Arc<dyn BroadcastBackend>,
    catch_up_cap: usize,
    metrics: Metrics,
}

impl SubscriptionServer {
    pub fn new(backend: Arc<dyn BroadcastBackend>, catch_up_cap: usize) -> Self {
        Self {
            backend,
            catch_up_cap: catch_up_cap.max(1),
            metrics: Metrics::new(),
        }
    }

    pub fn catch_up_cap(&self) -> usize {
        self.catch_up_cap
    }

    pub fn backend(&self) -> &Arc<dyn BroadcastBackend> {
        &self.backend
    }

    /// Open a stream for `actor_id` within `tenant_id`.
    ///
    /// With `since`, everything after it is replayed before live delivery
    /// starts, or `StaleCursor` is returned when that history is no longer
    /// complete. Without it, delivery starts at the tenant's current head.
    pub async fn open_stream(
        &self,
        tenant_id: &TenantId,
        actor_id: &ActorId,
        since: Option<Cursor>,
    ) -> SyncErrorResult<EnvelopeStream> {
        Ok(self.subscribe(tenant_id, actor_id, since).await?.envelopes)
    }

    /// Like [`Self::open_stream`], also reporting the starting cursor
    pub async fn subscribe(
        &self,
        tenant_id: &TenantId,
        actor_id: &ActorId,
        since: Option<Cursor>,
    ) -> SyncErrorResult<OpenedStream> {
        let subscription = Subscription::new(
            tenant_id.clone(),
            actor_id.clone(),
            since.unwrap_or(Cursor::ORIGIN),
        );
        let span = create_stream_span(&subscription);
        self.open(subscription, since).instrument(span).await
    }

    async fn open(
        &self,
        mut subscription: Subscription,
        since: Option<Cursor>,
    ) -> SyncErrorResult<OpenedStream> {
        let tenant_id = subscription.tenant_id.clone();

        let start = match since {
            Some(cursor) => cursor,
            None => self.backend.head(&tenant_id).await?,
        };
        subscription.cursor = start;

        // Attach before the final log read so nothing published in between is lost
        let feed = self.backend.attach_live(&tenant_id).await?;
        let page = self
            .backend
            .read_log_since(&tenant_id, start, self.catch_up_cap)
            .await?;

        let stale = match since {
            Some(cursor) => page.has_more || page.is_stale_for(cursor),
            None => page.has_gap_after(start),
        };
        if stale {
            self.metrics.stale_cursor();
            log::info!(
                "Cursor {} for tenant {} is stale (has_more={}, trimmed_through={:?})",
                start,
                tenant_id,
                page.has_more,
                page.trimmed_through
            );
            return Err(SyncError::stale_cursor(
                start,
                "history after this cursor is no longer retained",
            ));
        }

        let mut state = StreamState {
            backend: Arc::clone(&self.backend),
            subscription,
            feed,
            pending: VecDeque::new(),
            catch_up_ids: HashSet::new(),
            catch_up_through: start,
            cap: self.catch_up_cap,
            metrics: self.metrics.clone(),
            needs_fill: since.is_none() && page.has_more,
            finished: false,
        };

        self.metrics.stream_opened();
        if let Err(e) = state.enqueue(page.envelopes) {
            self.metrics.tenant_mismatch();
            return Err(e);
        }
        state.catch_up_through = state.subscription.cursor;
        state.catch_up_ids = state.pending.iter().map(Envelope::id).collect();

        self.metrics.catch_up_replayed(state.pending.len());
        log::info!(
            "Opened stream {} for actor {} in tenant {} at cursor {} ({} catch-up envelopes)",
            state.subscription.connection_id,
            state.subscription.actor_id,
            tenant_id,
            start,
            state.pending.len()
        );

        let envelopes = stream::unfold(state, |mut state| async move {
            state.next_item().await.map(|item| (item, state))
        });
        Ok(OpenedStream {
            start,
            envelopes: Box::pin(envelopes),
        })
    }

    /// Envelopes after `since` for the polling variant.
    ///
    /// Without a cursor the page is empty and carries the tenant's head.
    /// Self-authored envelopes are omitted but still advance the cursor.
    pub async fn catch_up(
        &self,
        tenant_id: &TenantId,
        actor_id: &ActorId,
        since: Option<Cursor>,
        limit: usize,
    ) -> SyncErrorResult<CatchUpPage> {
        let Some(since) = since else {
            return Ok(CatchUpPage {
                envelopes: Vec::new(),
                cursor: self.backend.head(tenant_id).await?,
                has_more: false,
            });
        };

        let limit = limit.clamp(1, self.catch_up_cap);
        let page = self.backend.read_log_since(tenant_id, since, limit).await?;

        if page.is_stale_for(since) {
            self.metrics.stale_cursor();
            return Err(SyncError::stale_cursor(
                since,
                "history after this cursor is no longer retained",
            ));
        }

        let cursor = page.last_cursor().unwrap_or(since);
        let mut envelopes = Vec::with_capacity(page.envelopes.len());
        for envelope in page.envelopes {
            if let Err(e) = ensure_tenant(tenant_id, &envelope) {
                self.metrics.tenant_mismatch();
                return Err(e);
            }
            if !envelope.is_authored_by(actor_id) {
                envelopes.push(envelope);
            }
        }
        self.metrics.catch_up_replayed(envelopes.len());

        Ok(CatchUpPage {
            envelopes,
            cursor,
            has_more: page.has_more,
        })
    }
}

struct StreamState {
    backend: Arc<dyn BroadcastBackend>,
    subscription: Subscription,
    feed: LiveFeed,
    pending: VecDeque<Envelope>,
    /// Ids replayed during catch-up, checked until live passes `catch_up_through`
    catch_up_ids: HashSet<EnvelopeId>,
    catch_up_through: Cursor,
    cap: usize,
    metrics: Metrics,
    needs_fill: bool,
    finished: bool,
}

impl StreamState {
    async fn next_item(&mut self) -> Option<SyncErrorResult<Envelope>> {
        loop {
            if let Some(envelope) = self.pending.pop_front() {
                return Some(Ok(envelope));
            }
            if self.finished {
                return None;
            }

            let step = if self.needs_fill {
                self.needs_fill = false;
                self.fill_gap(None).await
            } else {
                match self.feed.next().await {
                    Some(LiveEvent::Envelope(envelope)) => self.on_live(envelope).await,
                    Some(LiveEvent::Lagged(missed)) => {
                        log::debug!(
                            "Stream {} lagged by {} envelopes",
                            self.subscription.connection_id,
                            missed
                        );
                        self.metrics.live_lagged(missed);
                        self.fill_gap(None).await
                    }
                    None => {
                        self.finished = true;
                        Ok(())
                    }
                }
            };

            if let Err(e) = step {
                self.finished = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }

    async fn on_live(&mut self, envelope: Envelope) -> SyncErrorResult<()> {
        if let Err(e) = ensure_tenant(&self.subscription.tenant_id, &envelope) {
            self.metrics.tenant_mismatch();
            log::error!(
                "Stream {} received an envelope for tenant {}",
                self.subscription.connection_id,
                envelope.tenant_id()
            );
            return Err(e);
        }

        if !self.catch_up_ids.is_empty() {
            if envelope.cursor() > self.catch_up_through {
                self.catch_up_ids.clear();
            } else if self.catch_up_ids.contains(&envelope.id()) {
                self.metrics.duplicate_dropped();
                return Ok(());
            }
        }

        if envelope.cursor() <= self.subscription.cursor {
            self.metrics.duplicate_dropped();
            return Ok(());
        }

        self.fill_gap(Some(envelope)).await
    }

    /// Read the log from the cursor until the subscriber is caught up, then
    /// queue the triggering envelope if the log did not contain it.
    async fn fill_gap(&mut self, trigger: Option<Envelope>) -> SyncErrorResult<()> {
        let tenant_id = self.subscription.tenant_id.clone();
        let mut filled = 0;

        loop {
            let cursor = self.subscription.cursor;
            let page = self
                .backend
                .read_log_since(&tenant_id, cursor, self.cap)
                .await?;

            if page.has_gap_after(cursor) {
                self.metrics.stale_cursor();
                log::info!(
                    "Stream {} fell behind the retained log at cursor {}",
                    self.subscription.connection_id,
                    cursor
                );
                return Err(SyncError::stale_cursor(
                    cursor,
                    "live delivery fell behind the retained log",
                ));
            }

            let has_more = page.has_more;
            filled += self.enqueue(page.envelopes)?;
            if !has_more {
                break;
            }
        }

        if let Some(envelope) = trigger {
            filled += self.enqueue(vec![envelope])?;
        }
        if filled > 1 {
            self.metrics.gap_fill(filled);
        }

        Ok(())
    }

    /// Queue envelopes newer than the cursor, advancing it past each one.
    /// Returns how many were queued.
    fn enqueue(&mut self, envelopes: Vec<Envelope>) -> SyncErrorResult<usize> {
        let mut queued = 0;
        for envelope in envelopes {
            ensure_tenant(&self.subscription.tenant_id, &envelope)?;

            if envelope.cursor() <= self.subscription.cursor {
                continue;
            }
            self.subscription.advance(envelope.cursor());

            if envelope.is_authored_by(&self.subscription.actor_id) {
                self.metrics.self_echo_suppressed();
                continue;
            }
            self.pending.push_back(envelope);
            queued += 1;
        }
        Ok(queued)
    }
}

impl Drop for StreamState {
    fn drop(&mut self) {
        self.metrics.stream_closed();
        log::info!(
            "Closed stream {} for actor {} in tenant {}",
            self.subscription.connection_id,
            self.subscription.actor_id,
            self.subscription.tenant_id
        );
    }
}
