use crate::{ActorId, ChangeKind, Cursor, Envelope, EnvelopeDraft, EnvelopeId, SyncModule, TenantId};

use googletest::prelude::*;
use serde_json::json;

fn envelope() -> Envelope {
    let draft = EnvelopeDraft::new(
        ChangeKind::Update,
        SyncModule::Budget,
        "line-9",
        TenantId::new("tenant-a"),
        ActorId::new("u1"),
    )
    .with_payload(json!({"amount": 1200}))
    .with_target("budget.lines");

    Envelope::from_draft(draft, EnvelopeId::new(), Cursor::from_millis(1_000))
}

#[test]
fn given_envelope_when_serialized_then_uses_camel_case_wire_names() {
    let value = serde_json::to_value(envelope()).unwrap();

    assert_eq!(value["entityId"], json!("line-9"));
    assert_eq!(value["tenantId"], json!("tenant-a"));
    assert_eq!(value["actorId"], json!("u1"));
    assert_eq!(value["timestamp"], json!(1_000));
    assert_eq!(value["invalidationTargets"], json!(["budget.lines"]));
    assert!(value.get("scopeId").is_none());
}

#[test]
fn given_wire_json_when_deserialized_then_equal_envelope() {
    let original = envelope();
    let json = serde_json::to_string(&original).unwrap();

    let decoded: Envelope = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn given_envelope_when_restamped_then_only_timestamp_changes() {
    let original = envelope();
    let restamped = original.clone().restamped(Cursor::from_millis(2_000));

    assert_that!(restamped.cursor(), eq(Cursor::from_millis(2_000)));
    assert_that!(restamped.id(), eq(original.id()));
    assert_that!(restamped.entity_id(), eq(original.entity_id()));
}

#[test]
fn given_envelope_when_checking_author_then_compares_actor_equality() {
    let envelope = envelope();
    assert!(envelope.is_authored_by(&ActorId::new("u1")));
    assert!(!envelope.is_authored_by(&ActorId::new("u2")));
    assert!(envelope.belongs_to(&TenantId::new("tenant-a")));
    assert!(!envelope.belongs_to(&TenantId::new("tenant-b")));
}
