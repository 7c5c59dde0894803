//! wp-client
//!
//! Keeps a client's cached queries in step with its tenant's change stream.

pub mod backoff;
pub mod client_reconciler;
pub mod cursor_store;
pub mod error;
pub mod file_cursor_store;
pub mod in_process_source;
pub mod memory_cursor_store;
pub mod query_cache;
pub mod query_invalidator;
pub mod sse_parser;
pub mod sse_source;
pub mod stream_source;

pub use backoff::Backoff;
pub use client_reconciler::ClientReconciler;
pub use cursor_store::CursorStore;
pub use error::{ClientError, Result as ClientResult};
pub use file_cursor_store::FileCursorStore;
pub use in_process_source::InProcessSource;
pub use memory_cursor_store::MemoryCursorStore;
pub use query_cache::QueryCache;
pub use query_invalidator::QueryInvalidator;
pub use sse_parser::{SseFrame, SseParser};
pub use sse_source::SseSource;
pub use stream_source::{ClientStream, OpenedFeed, StreamSource};

#[cfg(test)]
mod tests;
