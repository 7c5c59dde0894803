use crate::{
    BroadcastBackend, Clock, Metrics, MetricsTimer, Result as SyncErrorResult, RetryConfig,
    SyncError, with_retry,
};

use wp_auth::TenantContext;
use wp_core::{Envelope, EnvelopeDraft, EnvelopeId};

use std::sync::Arc;

/// Turns committed mutations into envelopes: append to the tenant's log,
/// then push live.
pub struct ChangePublisher {
    backend: Arc<dyn BroadcastBackend>,
    clock: Arc<dyn Clock>,
    retry: RetryConfig,
    metrics: Metrics,
}

impl ChangePublisher {
    pub fn new(backend: Arc<dyn BroadcastBackend>, clock: Arc<dyn Clock>, retry: RetryConfig) -> Self {
        Self {
            backend,
            clock,
            retry,
            metrics: Metrics::new(),
        }
    }

    /// Publish one change for the session's tenant.
    ///
    /// Returns the envelope as stored once both the log append and the live
    /// push were acknowledged.
    pub async fn publish(
        &self,
        session: &TenantContext,
        draft: EnvelopeDraft,
    ) -> SyncErrorResult<Envelope> {
        if !session.owns(&draft.tenant_id) {
            self.metrics.tenant_mismatch();
            return Err(SyncError::tenant_mismatch(&session.tenant_id, &draft.tenant_id));
        }
        draft.validate()?;

        let timer = MetricsTimer::new(self.metrics.clone(), "publish");
        let tenant_id = session.tenant_id.clone();
        let envelope = Envelope::from_draft(draft, EnvelopeId::new(), self.clock.now());

        let stored = match with_retry(&self.retry, "append_log", || {
            let backend = Arc::clone(&self.backend);
            let tenant_id = tenant_id.clone();
            let envelope = envelope.clone();
            async move { backend.append_log(&tenant_id, envelope).await }
        })
        .await
        {
            Ok(stored) => stored,
            Err(e) => {
                self.metrics.publish_failed(e.error_code());
                return Err(e);
            }
        };

        let receivers = match with_retry(&self.retry, "publish_live", || {
            let backend = Arc::clone(&self.backend);
            let tenant_id = tenant_id.clone();
            let stored = stored.clone();
            async move { backend.publish_live(&tenant_id, &stored).await }
        })
        .await
        {
            Ok(receivers) => receivers,
            Err(e) => {
                self.metrics.publish_failed(e.error_code());
                return Err(e);
            }
        };

        timer.finish();
        self.metrics
            .envelope_published(stored.module().as_str(), receivers);
        log::debug!(
            "Published {} {} {} for tenant {} at {} ({} receivers)",
            stored.kind().as_str(),
            stored.module().as_str(),
            stored.entity_id(),
            tenant_id,
            stored.timestamp(),
            receivers
        );

        Ok(stored)
    }

    /// Publish from a mutation handler after its write committed.
    ///
    /// An unavailable backend is logged and reported as `Ok(None)`; the
    /// caller's write stands. Tenant and validation errors propagate.
    pub async fn notify_change(
        &self,
        session: &TenantContext,
        draft: EnvelopeDraft,
    ) -> SyncErrorResult<Option<Envelope>> {
        match self.publish(session, draft).await {
            Ok(envelope) => Ok(Some(envelope)),
            Err(SyncError::BroadcastUnavailable { message, .. }) => {
                log::warn!(
                    "Change for tenant {} was committed but not broadcast: {}",
                    session.tenant_id,
                    message
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn backend(&self) -> &Arc<dyn BroadcastBackend> {
        &self.backend
    }
}
