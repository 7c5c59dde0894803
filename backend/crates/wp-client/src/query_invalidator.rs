use wp_core::InvalidationTarget;

use std::sync::Arc;

/// Whatever holds the client's cached query results
pub trait QueryInvalidator: Send + Sync {
    /// Mark one named query stale. Must be idempotent.
    fn invalidate(&self, target: &InvalidationTarget);

    /// Mark every cached query stale
    fn invalidate_all(&self);
}

impl<T: QueryInvalidator + ?Sized> QueryInvalidator for Arc<T> {
    fn invalidate(&self, target: &InvalidationTarget) {
        (**self).invalidate(target)
    }

    fn invalidate_all(&self) {
        (**self).invalidate_all()
    }
}
