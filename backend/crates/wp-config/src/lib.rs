mod auth_config;
mod backend_kind;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod reconnect_config;
mod retry_config;
mod server_config;
mod sync_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use backend_kind::BackendKind;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use reconnect_config::ReconnectConfig;
pub use retry_config::RetryConfig;
pub use server_config::ServerConfig;
pub use sync_config::SyncConfig;

const CONFIG_DIR_NAME: &str = ".wp";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "WP_CONFIG_DIR";

const DEFAULT_DATABASE_FILENAME: &str = "sync.db";

const DEFAULT_AUTH_ENABLED: bool = false;
const MIN_JWT_SECRET_LENGTH: usize = 32;
const DEFAULT_TENANT_ID: &str = "local";
const DEFAULT_ACTOR_ID: &str = "local-user";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
