mod error;
mod extractors;
mod sync_query;
