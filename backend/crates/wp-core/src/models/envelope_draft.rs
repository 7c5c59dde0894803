use crate::{
    ActorId, ChangeKind, CoreError, CoreResult, InvalidationTarget, MAX_IDENTIFIER_LENGTH,
    MAX_INVALIDATION_TARGETS, SyncModule, TenantId,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a mutation handler knows about a committed change.
/// The publisher adds `id` and `timestamp` to turn it into an [`crate::Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDraft {
    pub kind: ChangeKind,
    pub module: SyncModule,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    pub actor_id: ActorId,
    #[serde(default)]
    pub invalidation_targets: Vec<InvalidationTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_tool: Option<String>,
}

impl EnvelopeDraft {
    pub fn new(
        kind: ChangeKind,
        module: SyncModule,
        entity_id: impl Into<String>,
        tenant_id: TenantId,
        actor_id: ActorId,
    ) -> Self {
        Self {
            kind,
            module,
            entity_id: entity_id.into(),
            payload: None,
            tenant_id,
            scope_id: None,
            actor_id,
            invalidation_targets: Vec::new(),
            origin_tool: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_scope(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.invalidation_targets
            .push(InvalidationTarget::new(target.into()));
        self
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invalidation_targets
            .extend(targets.into_iter().map(|t| InvalidationTarget::new(t.into())));
        self
    }

    pub fn with_origin_tool(mut self, origin_tool: impl Into<String>) -> Self {
        self.origin_tool = Some(origin_tool.into());
        self
    }

    /// Reject drafts that could not be routed or consumed
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        check_identifier("tenant_id", self.tenant_id.as_str())?;
        check_identifier("actor_id", self.actor_id.as_str())?;
        check_identifier("entity_id", &self.entity_id)?;

        if let Some(scope_id) = &self.scope_id {
            check_identifier("scope_id", scope_id)?;
        }

        if self.invalidation_targets.len() > MAX_INVALIDATION_TARGETS {
            return Err(CoreError::validation(
                "invalidation_targets",
                format!(
                    "at most {} invalidation targets allowed, got {}",
                    MAX_INVALIDATION_TARGETS,
                    self.invalidation_targets.len()
                ),
            ));
        }

        if self
            .invalidation_targets
            .iter()
            .any(|target| target.as_str().trim().is_empty())
        {
            return Err(CoreError::validation(
                "invalidation_targets",
                "invalidation targets cannot be empty",
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn check_identifier(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, format!("{} cannot be empty", field)));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CoreError::validation(
            field,
            format!("{} exceeds {} characters", field, MAX_IDENTIFIER_LENGTH),
        ));
    }
    Ok(())
}
