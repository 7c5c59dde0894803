use wp_core::{Cursor, Envelope};

/// One read of a tenant's bounded log
#[derive(Debug, Clone, Default)]
pub struct LogPage {
    /// Envelopes strictly after the requested cursor, oldest first
    pub envelopes: Vec<Envelope>,
    /// More envelopes exist beyond `limit`
    pub has_more: bool,
    /// Newest timestamp ever evicted from this tenant's log
    pub trimmed_through: Option<Cursor>,
    /// Oldest timestamp still held in the whole log, not just this page
    pub oldest_retained: Option<Cursor>,
    /// Cursors below this predate the log entirely (e.g. from before a
    /// process-local log was created)
    pub epoch: Cursor,
}

impl LogPage {
    /// Whether replaying from `cursor` could miss history.
    ///
    /// Once anything has been evicted, a cursor at or before the oldest
    /// retained entry is stale. With nothing retained, only cursors below the
    /// watermark are.
    pub fn is_stale_for(&self, cursor: Cursor) -> bool {
        if cursor < self.epoch {
            return true;
        }
        match (self.trimmed_through, self.oldest_retained) {
            (None, _) => false,
            (Some(_), Some(oldest)) => cursor <= oldest,
            (Some(trimmed), None) => cursor < trimmed,
        }
    }

    /// Whether an envelope newer than `cursor` has already been evicted
    pub fn has_gap_after(&self, cursor: Cursor) -> bool {
        cursor < self.epoch || self.trimmed_through.is_some_and(|trimmed| cursor < trimmed)
    }

    pub fn last_cursor(&self) -> Option<Cursor> {
        self.envelopes.last().map(|e| e.cursor())
    }
}
