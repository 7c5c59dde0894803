pub mod actor_id;
pub mod change_kind;
pub mod cursor;
pub mod envelope;
pub mod envelope_draft;
pub mod envelope_id;
pub mod invalidation_target;
pub mod sync_module;
pub mod tenant_id;
