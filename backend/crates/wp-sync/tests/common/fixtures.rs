use wp_auth::TenantContext;
use wp_core::{ActorId, ChangeKind, EnvelopeDraft, SyncModule, TenantId};

pub fn context(tenant: &str, actor: &str) -> TenantContext {
    TenantContext::new(TenantId::new(tenant), ActorId::new(actor))
}

pub fn draft(tenant: &str, actor: &str, entity_id: &str) -> EnvelopeDraft {
    EnvelopeDraft::new(
        ChangeKind::Update,
        SyncModule::Budget,
        entity_id,
        TenantId::new(tenant),
        ActorId::new(actor),
    )
    .with_target("budget.summary")
}

/// A guest added to a wedding, as the guests handler publishes it
pub fn guest_insert(tenant: &str, actor: &str, guest_id: &str) -> EnvelopeDraft {
    EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        guest_id,
        TenantId::new(tenant),
        ActorId::new(actor),
    )
    .with_scope("wedding-1")
    .with_targets(["guests.list", "wedding.guest_count"])
    .with_origin_tool("planner-web")
}
