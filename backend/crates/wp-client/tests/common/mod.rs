#![allow(dead_code)]

mod scripted_source;

pub use scripted_source::{ScriptedSource, Session};

use wp_core::{ActorId, ChangeKind, Cursor, Envelope, EnvelopeDraft, EnvelopeId, SyncModule, TenantId};

pub fn envelope(tenant: &str, actor: &str, timestamp: i64, targets: &[&str]) -> Envelope {
    let draft = EnvelopeDraft::new(
        ChangeKind::Update,
        SyncModule::Guests,
        format!("guest-{}", timestamp),
        TenantId::new(tenant),
        ActorId::new(actor),
    )
    .with_targets(targets.iter().copied());
    Envelope::from_draft(draft, EnvelopeId::new(), Cursor::from_millis(timestamp))
}
