pub mod error;
pub mod models;

pub use error::{CoreError, Result as CoreResult};
pub use error_location::ErrorLocation;
pub use models::actor_id::ActorId;
pub use models::change_kind::ChangeKind;
pub use models::cursor::Cursor;
pub use models::envelope::Envelope;
pub use models::envelope_draft::EnvelopeDraft;
pub use models::envelope_id::EnvelopeId;
pub use models::invalidation_target::InvalidationTarget;
pub use models::sync_module::SyncModule;
pub use models::tenant_id::TenantId;

/// Upper bound for tenant, actor and entity identifiers
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Upper bound for the number of invalidation targets carried by one envelope
pub const MAX_INVALIDATION_TARGETS: usize = 64;

#[cfg(test)]
mod tests;
