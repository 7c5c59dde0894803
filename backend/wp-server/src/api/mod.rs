pub mod changes;
pub mod error;
pub mod extractors;
pub mod sync_query;
pub mod sync_stream;
