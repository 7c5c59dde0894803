use crate::{
    ActorId, ChangeKind, Cursor, EnvelopeDraft, EnvelopeId, InvalidationTarget, SyncModule,
    TenantId,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable record describing one committed data change.
///
/// Fields are private: once built by the publisher an envelope is only ever
/// read, cloned, or re-stamped into a new value before it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    id: EnvelopeId,
    kind: ChangeKind,
    module: SyncModule,
    entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope_id: Option<String>,
    actor_id: ActorId,
    timestamp: i64,
    #[serde(default)]
    invalidation_targets: Vec<InvalidationTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin_tool: Option<String>,
}

impl Envelope {
    pub fn from_draft(draft: EnvelopeDraft, id: EnvelopeId, timestamp: Cursor) -> Self {
        Self {
            id,
            kind: draft.kind,
            module: draft.module,
            entity_id: draft.entity_id,
            payload: draft.payload,
            tenant_id: draft.tenant_id,
            scope_id: draft.scope_id,
            actor_id: draft.actor_id,
            timestamp: timestamp.as_millis(),
            invalidation_targets: draft.invalidation_targets,
            origin_tool: draft.origin_tool,
        }
    }

    /// Same envelope at a later log position. Used by log backends to keep
    /// per-tenant timestamps strictly increasing before the envelope is published.
    pub fn restamped(mut self, timestamp: Cursor) -> Self {
        self.timestamp = timestamp.as_millis();
        self
    }

    pub fn id(&self) -> EnvelopeId {
        self.id
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn module(&self) -> SyncModule {
        self.module
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn scope_id(&self) -> Option<&str> {
        self.scope_id.as_deref()
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The envelope's log position, as a subscriber high-water mark
    pub fn cursor(&self) -> Cursor {
        Cursor::from_millis(self.timestamp)
    }

    pub fn invalidation_targets(&self) -> &[InvalidationTarget] {
        &self.invalidation_targets
    }

    pub fn origin_tool(&self) -> Option<&str> {
        self.origin_tool.as_deref()
    }

    pub fn is_authored_by(&self, actor_id: &ActorId) -> bool {
        &self.actor_id == actor_id
    }

    pub fn belongs_to(&self, tenant_id: &TenantId) -> bool {
        &self.tenant_id == tenant_id
    }
}
