use crate::{ClientError, ClientResult, OpenedFeed, StreamSource};

use wp_core::{ActorId, Cursor, TenantId};
use wp_sync::SubscriptionServer;

use async_trait::async_trait;
use futures::StreamExt;

/// Stream source for clients living in the same process as the server
pub struct InProcessSource {
    server: SubscriptionServer,
    tenant_id: TenantId,
    actor_id: ActorId,
}

impl InProcessSource {
    pub fn new(server: SubscriptionServer, tenant_id: TenantId, actor_id: ActorId) -> Self {
        Self {
            server,
            tenant_id,
            actor_id,
        }
    }
}

#[async_trait]
impl StreamSource for InProcessSource {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed> {
        let opened = self
            .server
            .subscribe(&self.tenant_id, &self.actor_id, since)
            .await?;
        Ok(OpenedFeed::new(
            Some(opened.start),
            Box::pin(opened.envelopes.map(|item| item.map_err(ClientError::from))),
        ))
    }
}
