use crate::{
    BroadcastBackend, BroadcastConfig, Clock, LiveEvent, LiveFeed, LogPage,
    Result as SyncErrorResult, TenantBroadcaster, ensure_tenant,
};

use wp_core::{Cursor, Envelope, TenantId};
use wp_db::{DbError, SyncLogRepository};

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use sqlx::SqlitePool;

/// Backend over the shared SQLite log.
///
/// Same-process subscribers are woken by in-process push. Subscribers in
/// other processes see new envelopes on their next poll, so the poll
/// interval bounds cross-process live latency from below.
pub struct SqliteBackend {
    pool: SqlitePool,
    broadcaster: TenantBroadcaster,
    clock: Arc<dyn Clock>,
    config: BroadcastConfig,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool, config: BroadcastConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            broadcaster: TenantBroadcaster::new(config.channel_capacity),
            clock,
            config,
        }
    }

    pub fn broadcaster(&self) -> &TenantBroadcaster {
        &self.broadcaster
    }

    fn cutoff(&self) -> Cursor {
        self.clock
            .now()
            .saturating_sub_millis(self.config.retention_window_millis())
    }

    fn keep(&self) -> i64 {
        i64::try_from(self.config.retention_count).unwrap_or(i64::MAX)
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX - 1)
}

struct PollState {
    pool: SqlitePool,
    tenant_id: TenantId,
    cursor: Cursor,
    interval: Duration,
    batch: usize,
    pending: VecDeque<Envelope>,
    skip_sleep: bool,
}

impl PollState {
    async fn next_event(&mut self) -> LiveEvent {
        loop {
            if let Some(envelope) = self.pending.pop_front() {
                return LiveEvent::Envelope(envelope);
            }

            if !self.skip_sleep {
                tokio::time::sleep(self.interval).await;
            }

            match SyncLogRepository::read_since(
                &self.pool,
                &self.tenant_id,
                self.cursor,
                sql_limit(self.batch),
            )
            .await
            {
                Ok(rows) => {
                    self.skip_sleep = rows.len() >= self.batch;
                    if let Some(last) = rows.last() {
                        self.cursor = last.cursor();
                    }
                    self.pending.extend(rows);
                }
                Err(e) => {
                    log::warn!("Log poll for tenant {} failed: {}", self.tenant_id, e);
                    self.skip_sleep = false;
                }
            }
        }
    }
}

#[async_trait]
impl BroadcastBackend for SqliteBackend {
    async fn publish_live(
        &self,
        tenant_id: &TenantId,
        envelope: &Envelope,
    ) -> SyncErrorResult<usize> {
        ensure_tenant(tenant_id, envelope)?;
        Ok(self.broadcaster.broadcast(tenant_id, envelope.clone()))
    }

    async fn append_log(
        &self,
        tenant_id: &TenantId,
        envelope: Envelope,
    ) -> SyncErrorResult<Envelope> {
        ensure_tenant(tenant_id, &envelope)?;

        let stored = SyncLogRepository::append(&self.pool, &envelope).await?;

        let outcome =
            SyncLogRepository::trim(&self.pool, tenant_id, self.keep(), self.cutoff()).await?;
        if outcome.removed > 0 {
            log::debug!(
                "Evicted {} envelopes from tenant {} log",
                outcome.removed,
                tenant_id
            );
        }

        Ok(stored)
    }

    async fn read_log_since(
        &self,
        tenant_id: &TenantId,
        cursor: Cursor,
        limit: usize,
    ) -> SyncErrorResult<LogPage> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let mut envelopes =
            SyncLogRepository::read_since(&mut *tx, tenant_id, cursor, sql_limit(limit) + 1)
                .await?;
        let trimmed_through = SyncLogRepository::watermark(&mut *tx, tenant_id).await?;
        let oldest_retained = SyncLogRepository::oldest_timestamp(&mut *tx, tenant_id).await?;
        tx.commit().await.map_err(DbError::from)?;

        let has_more = envelopes.len() > limit;
        envelopes.truncate(limit);
        for envelope in &envelopes {
            ensure_tenant(tenant_id, envelope)?;
        }

        Ok(LogPage {
            envelopes,
            has_more,
            trimmed_through,
            oldest_retained,
            epoch: Cursor::ORIGIN,
        })
    }

    async fn attach_live(&self, tenant_id: &TenantId) -> SyncErrorResult<LiveFeed> {
        let push = self.broadcaster.subscribe(tenant_id);

        let state = PollState {
            pool: self.pool.clone(),
            tenant_id: tenant_id.clone(),
            cursor: self.head(tenant_id).await?,
            interval: self.config.poll_interval,
            batch: self.config.catch_up_cap.max(1),
            pending: VecDeque::new(),
            skip_sleep: false,
        };
        let poll = stream::unfold(state, |mut state| async move {
            let event = state.next_event().await;
            Some((event, state))
        });

        Ok(LiveFeed::new(stream::select(push, poll)))
    }

    async fn head(&self, tenant_id: &TenantId) -> SyncErrorResult<Cursor> {
        if let Some(newest) = SyncLogRepository::newest_timestamp(&self.pool, tenant_id).await? {
            return Ok(newest);
        }
        Ok(SyncLogRepository::watermark(&self.pool, tenant_id)
            .await?
            .unwrap_or(Cursor::ORIGIN))
    }

    async fn trim(&self, tenant_id: &TenantId) -> SyncErrorResult<usize> {
        let outcome =
            SyncLogRepository::trim(&self.pool, tenant_id, self.keep(), self.cutoff()).await?;
        Ok(usize::try_from(outcome.removed).unwrap_or(usize::MAX))
    }

    async fn trim_all(&self) -> SyncErrorResult<usize> {
        let cutoff = self.cutoff();
        let mut removed = 0;
        for tenant_id in SyncLogRepository::tenants(&self.pool).await? {
            let outcome =
                SyncLogRepository::trim(&self.pool, &tenant_id, self.keep(), cutoff).await?;
            removed += usize::try_from(outcome.removed).unwrap_or(usize::MAX);
        }
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
