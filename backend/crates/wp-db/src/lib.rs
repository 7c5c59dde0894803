pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::sqlite_pool::{open_in_memory_pool, open_pool, run_migrations};
pub use error::{DbError, Result};
pub use repositories::sync_log_repository::SyncLogRepository;
pub use repositories::trim_outcome::TrimOutcome;
