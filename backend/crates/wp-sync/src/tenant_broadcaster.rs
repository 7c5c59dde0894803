use crate::LiveEvent;

use wp_core::{Envelope, TenantId};

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Manages live broadcast channels for all tenants within this process
pub struct TenantBroadcaster {
    inner: Arc<Mutex<BroadcasterInner>>,
    channel_capacity: usize,
}

struct BroadcasterInner {
    channels: HashMap<TenantId, TenantChannel>,
}

/// Per-tenant broadcast channel
struct TenantChannel {
    sender: broadcast::Sender<Envelope>,
    subscriber_count: usize,
}

fn lock(inner: &Mutex<BroadcasterInner>) -> MutexGuard<'_, BroadcasterInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TenantBroadcaster {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BroadcasterInner {
                channels: HashMap::new(),
            })),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Subscribe to a tenant's broadcast channel.
    ///
    /// The subscription is released when the returned stream is dropped.
    pub fn subscribe(&self, tenant_id: &TenantId) -> TenantSubscription {
        let mut inner = lock(&self.inner);

        let channel = inner.channels.entry(tenant_id.clone()).or_insert_with(|| {
            let (sender, _) = broadcast::channel(self.channel_capacity);
            log::info!("Created broadcast channel for tenant {}", tenant_id);
            TenantChannel {
                sender,
                subscriber_count: 0,
            }
        });

        channel.subscriber_count += 1;
        let receiver = channel.sender.subscribe();

        log::debug!(
            "Subscribed to tenant {} broadcast ({} total subscribers)",
            tenant_id,
            channel.subscriber_count
        );

        let events = BroadcastStream::new(receiver).map(|item| match item {
            Ok(envelope) => LiveEvent::Envelope(envelope),
            Err(BroadcastStreamRecvError::Lagged(missed)) => LiveEvent::Lagged(missed),
        });

        TenantSubscription {
            events: Box::pin(events),
            _release: SubscriptionRelease {
                inner: Arc::clone(&self.inner),
                tenant_id: tenant_id.clone(),
            },
        }
    }

    /// Broadcast an envelope to all current subscribers of a tenant
    pub fn broadcast(&self, tenant_id: &TenantId, envelope: Envelope) -> usize {
        let inner = lock(&self.inner);

        let Some(channel) = inner.channels.get(tenant_id) else {
            log::debug!("No broadcast channel exists for tenant {}", tenant_id);
            return 0;
        };

        match channel.sender.send(envelope) {
            Ok(receiver_count) => {
                log::debug!(
                    "Broadcast envelope to tenant {} ({} receivers)",
                    tenant_id,
                    receiver_count
                );
                receiver_count
            }
            Err(_) => {
                log::debug!("Broadcast to tenant {} had no active receivers", tenant_id);
                0
            }
        }
    }

    pub fn subscriber_count(&self, tenant_id: &TenantId) -> usize {
        lock(&self.inner)
            .channels
            .get(tenant_id)
            .map(|c| c.subscriber_count)
            .unwrap_or(0)
    }

    pub fn active_tenants(&self) -> Vec<TenantId> {
        lock(&self.inner).channels.keys().cloned().collect()
    }

    pub fn channel_count(&self) -> usize {
        lock(&self.inner).channels.len()
    }
}

impl Clone for TenantBroadcaster {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            channel_capacity: self.channel_capacity,
        }
    }
}

/// Live envelopes for one tenant
pub struct TenantSubscription {
    events: Pin<Box<dyn Stream<Item = LiveEvent> + Send>>,
    _release: SubscriptionRelease,
}

impl Stream for TenantSubscription {
    type Item = LiveEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for TenantSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantSubscription")
            .field("tenant_id", &self._release.tenant_id)
            .finish_non_exhaustive()
    }
}

struct SubscriptionRelease {
    inner: Arc<Mutex<BroadcasterInner>>,
    tenant_id: TenantId,
}

impl Drop for SubscriptionRelease {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);

        if let Some(channel) = inner.channels.get_mut(&self.tenant_id) {
            channel.subscriber_count = channel.subscriber_count.saturating_sub(1);

            log::debug!(
                "Unsubscribed from tenant {} broadcast ({} remaining subscribers)",
                self.tenant_id,
                channel.subscriber_count
            );

            if channel.subscriber_count == 0 {
                inner.channels.remove(&self.tenant_id);
                log::info!("Removed empty broadcast channel for tenant {}", self.tenant_id);
            }
        }
    }
}
