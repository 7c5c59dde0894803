
use wp_core::{ActorId, ChangeKind, Cursor, Envelope, EnvelopeDraft, EnvelopeId, SyncModule, TenantId};

pub(crate) fn envelope(tenant: &str, actor: &str, timestamp: i64) -> Envelope {
    let draft = EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        format!("guest-{}", timestamp),
        TenantId::new(tenant),
        ActorId::new(actor),
    )
    .with_target("guests");
    Envelope::from_draft(draft, EnvelopeId::new(), Cursor::from_millis(timestamp))
}
