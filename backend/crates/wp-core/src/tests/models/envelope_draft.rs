use crate::{ActorId, ChangeKind, EnvelopeDraft, MAX_INVALIDATION_TARGETS, SyncModule, TenantId};

use googletest::prelude::*;

fn draft() -> EnvelopeDraft {
    EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        "g1",
        TenantId::new("tenant-a"),
        ActorId::new("u1"),
    )
    .with_target("guests.list")
}

#[test]
fn given_complete_draft_when_validated_then_ok() {
    assert_that!(draft().validate(), ok(anything()));
}

#[test]
fn given_empty_tenant_when_validated_then_error() {
    let mut draft = draft();
    draft.tenant_id = TenantId::new("");
    assert_that!(draft.validate(), err(anything()));
}

#[test]
fn given_blank_entity_id_when_validated_then_error() {
    let mut draft = draft();
    draft.entity_id = "   ".to_string();
    assert_that!(draft.validate(), err(anything()));
}

#[test]
fn given_blank_invalidation_target_when_validated_then_error() {
    let draft = draft().with_target(" ");
    assert_that!(draft.validate(), err(anything()));
}

#[test]
fn given_too_many_targets_when_validated_then_error() {
    let targets = (0..=MAX_INVALIDATION_TARGETS).map(|i| format!("query.{i}"));
    let draft = draft().with_targets(targets);
    assert_that!(draft.validate(), err(anything()));
}

#[test]
fn given_builder_calls_when_chained_then_targets_keep_order() {
    let draft = draft()
        .with_targets(["budget.summary", "budget.lines"])
        .with_scope("wedding-7")
        .with_origin_tool("assistant.add_guest");

    let names: Vec<&str> = draft
        .invalidation_targets
        .iter()
        .map(|t| t.as_str())
        .collect();
    assert_eq!(names, vec!["guests.list", "budget.summary", "budget.lines"]);
    assert_eq!(draft.scope_id.as_deref(), Some("wedding-7"));
    assert_eq!(draft.origin_tool.as_deref(), Some("assistant.add_guest"));
}
