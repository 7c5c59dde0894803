use crate::{
    BroadcastBackend, BroadcastConfig, Clock, LiveFeed, LogPage, Result as SyncErrorResult,
    TenantBroadcaster, ensure_tenant,
};

use wp_core::{Cursor, Envelope, TenantId};

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

/// Process-local backend: a `VecDeque` log per tenant plus in-process
/// broadcast channels.
///
/// Nothing survives a restart. Cursors older than the moment the backend was
/// created are therefore reported stale.
///
/// A tenant whose log has been emptied by age is forgotten on the next trim,
/// so the map holds only tenants with history inside the retention window.
/// Their watermarks fold into `forgotten_through`, which acts as the epoch
/// for tenants without a log.
pub struct InMemoryBackend {
    logs: Mutex<HashMap<TenantId, TenantLog>>,
    broadcaster: TenantBroadcaster,
    clock: Arc<dyn Clock>,
    config: BroadcastConfig,
    epoch: Cursor,
    forgotten_through: AtomicI64,
}

#[derive(Default)]
struct TenantLog {
    entries: VecDeque<Envelope>,
    trimmed_through: Option<Cursor>,
}

impl TenantLog {
    fn newest(&self) -> Option<Cursor> {
        self.entries.back().map(Envelope::cursor)
    }

    fn oldest(&self) -> Option<Cursor> {
        self.entries.front().map(Envelope::cursor)
    }

    /// Nothing retained and nothing evicted inside the window
    fn is_expired(&self, cutoff: Cursor) -> bool {
        self.entries.is_empty() && self.trimmed_through.is_none_or(|t| t < cutoff)
    }

    /// Evict by count, then by age. Returns the number of evicted envelopes.
    fn evict(&mut self, keep: usize, cutoff: Cursor) -> usize {
        let mut removed = 0;
        while let Some(front) = self.entries.front() {
            if self.entries.len() <= keep && front.cursor() >= cutoff {
                break;
            }
            let evicted = front.cursor();
            self.entries.pop_front();
            self.trimmed_through = Some(self.trimmed_through.map_or(evicted, |t| t.max(evicted)));
            removed += 1;
        }
        removed
    }
}

impl InMemoryBackend {
    pub fn new(config: BroadcastConfig, clock: Arc<dyn Clock>) -> Self {
        let epoch = clock.now();
        Self {
            logs: Mutex::new(HashMap::new()),
            broadcaster: TenantBroadcaster::new(config.channel_capacity),
            clock,
            config,
            epoch,
            forgotten_through: AtomicI64::new(Cursor::ORIGIN.as_millis()),
        }
    }

    pub fn broadcaster(&self) -> &TenantBroadcaster {
        &self.broadcaster
    }

    /// Number of envelopes currently retained for the tenant
    pub fn retained(&self, tenant_id: &TenantId) -> usize {
        self.logs()
            .get(tenant_id)
            .map(|log| log.entries.len())
            .unwrap_or(0)
    }

    /// Tenants currently holding a log
    pub fn tracked_tenants(&self) -> usize {
        self.logs().len()
    }

    /// Lowest valid cursor for a tenant without a log
    fn unknown_floor(&self) -> Cursor {
        self.epoch
            .max(Cursor::from_millis(self.forgotten_through.load(Ordering::SeqCst)))
    }

    /// Drop expired logs, remembering their watermarks
    fn forget_expired(&self, logs: &mut HashMap<TenantId, TenantLog>, cutoff: Cursor) {
        logs.retain(|tenant_id, log| {
            if !log.is_expired(cutoff) {
                return true;
            }
            if let Some(trimmed) = log.trimmed_through {
                self.forgotten_through
                    .fetch_max(trimmed.as_millis(), Ordering::SeqCst);
            }
            log::debug!("Dropped expired log for tenant {}", tenant_id);
            false
        });
    }

    fn logs(&self) -> MutexGuard<'_, HashMap<TenantId, TenantLog>> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cutoff(&self) -> Cursor {
        self.clock
            .now()
            .saturating_sub_millis(self.config.retention_window_millis())
    }
}

#[async_trait]
impl BroadcastBackend for InMemoryBackend {
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
        let cutoff = self.cutoff();

        let mut logs = self.logs();
        let floor = self.unknown_floor();
        let log = logs.entry(tenant_id.clone()).or_default();

        let floor = log
            .newest()
            .into_iter()
            .chain(log.trimmed_through)
            .fold(floor, Cursor::max);
        let timestamp = envelope
            .cursor()
            .max(Cursor::from_millis(floor.as_millis() + 1));
        let stored = envelope.restamped(timestamp);

        log.entries.push_back(stored.clone());
        let removed = log.evict(self.config.retention_count, cutoff);
        if removed > 0 {
            log::debug!("Evicted {} envelopes from tenant {} log", removed, tenant_id);
        }

        Ok(stored)
    }

    async fn read_log_since(
        &self,
        tenant_id: &TenantId,
        cursor: Cursor,
        limit: usize,
    ) -> SyncErrorResult<LogPage> {
        let logs = self.logs();

        let Some(log) = logs.get(tenant_id) else {
            return Ok(LogPage {
                epoch: self.unknown_floor(),
                ..LogPage::default()
            });
        };

        let start = log.entries.partition_point(|e| e.cursor() <= cursor);
        let available = log.entries.len() - start;
        let envelopes: Vec<Envelope> = log.entries.iter().skip(start).take(limit).cloned().collect();
        for envelope in &envelopes {
            ensure_tenant(tenant_id, envelope)?;
        }

        Ok(LogPage {
            has_more: available > envelopes.len(),
            envelopes,
            trimmed_through: log.trimmed_through,
            oldest_retained: log.oldest(),
            epoch: self.epoch,
        })
    }

    async fn attach_live(&self, tenant_id: &TenantId) -> SyncErrorResult<LiveFeed> {
        Ok(LiveFeed::new(self.broadcaster.subscribe(tenant_id)))
    }

    async fn head(&self, tenant_id: &TenantId) -> SyncErrorResult<Cursor> {
        let logs = self.logs();
        let head = match logs.get(tenant_id) {
            Some(log) => log
                .newest()
                .unwrap_or_else(|| log.trimmed_through.map_or(self.epoch, |t| t.max(self.epoch))),
            None => self.unknown_floor(),
        };
        Ok(head)
    }

    async fn trim(&self, tenant_id: &TenantId) -> SyncErrorResult<usize> {
        let cutoff = self.cutoff();
        let mut logs = self.logs();
        let removed = logs
            .get_mut(tenant_id)
            .map(|log| log.evict(self.config.retention_count, cutoff))
            .unwrap_or(0);
        if logs.get(tenant_id).is_some_and(|log| log.is_expired(cutoff)) {
            self.forget_expired(&mut logs, cutoff);
        }
        Ok(removed)
    }

    async fn trim_all(&self) -> SyncErrorResult<usize> {
        let cutoff = self.cutoff();
        let mut logs = self.logs();
        let removed = logs
            .values_mut()
            .map(|log| log.evict(self.config.retention_count, cutoff))
            .sum();
        self.forget_expired(&mut logs, cutoff);
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
