use crate::{ClientResult, CursorStore};

use wp_core::Cursor;

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

/// Cursor store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursor: Mutex<Option<Cursor>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Mutex::new(Some(cursor)),
        }
    }

    pub fn current(&self) -> Option<Cursor> {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, value: Option<Cursor>) {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self) -> ClientResult<Option<Cursor>> {
        Ok(self.current())
    }

    async fn save(&self, cursor: Cursor) -> ClientResult<()> {
        self.set(Some(cursor));
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        self.set(None);
        Ok(())
    }
}
