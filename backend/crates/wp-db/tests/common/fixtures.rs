use wp_core::{
    ActorId, ChangeKind, Cursor, Envelope, EnvelopeDraft, EnvelopeId, SyncModule, TenantId,
};

pub fn tenant(id: &str) -> TenantId {
    TenantId::new(id)
}

pub fn envelope_at(tenant_id: &str, timestamp: i64) -> Envelope {
    let draft = EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        format!("guest-{timestamp}"),
        TenantId::new(tenant_id),
        ActorId::new("planner-1"),
    )
    .with_target("guests.list");

    Envelope::from_draft(draft, EnvelopeId::new(), Cursor::from_millis(timestamp))
}
