pub mod sync_log_repository;
pub mod trim_outcome;
