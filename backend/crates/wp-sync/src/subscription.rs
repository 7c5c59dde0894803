use crate::ConnectionId;

use wp_core::{ActorId, Cursor, TenantId};

/// One logical subscription, alive for the duration of a transport stream
#[derive(Debug, Clone)]
pub struct Subscription {
    pub tenant_id: TenantId,
    pub actor_id: ActorId,
    pub connection_id: ConnectionId,
    /// Timestamp of the newest envelope handed to (or skipped for) this
    /// subscriber
    pub cursor: Cursor,
}

impl Subscription {
    pub fn new(tenant_id: TenantId, actor_id: ActorId, cursor: Cursor) -> Self {
        Self {
            tenant_id,
            actor_id,
            connection_id: ConnectionId::new(),
            cursor,
        }
    }

    /// Move the cursor forward. Never moves it back.
    pub fn advance(&mut self, cursor: Cursor) {
        self.cursor = self.cursor.max(cursor);
    }
}
