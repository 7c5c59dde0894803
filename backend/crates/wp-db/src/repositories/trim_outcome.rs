use wp_core::Cursor;

/// Result of one retention pass over a tenant's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimOutcome {
    /// Rows deleted by this pass
    pub removed: u64,
    /// Newest evicted timestamp after the pass, if anything was ever evicted
    pub trimmed_through: Option<Cursor>,
}
