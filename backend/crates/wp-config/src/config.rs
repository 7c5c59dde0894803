use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DatabaseConfig, LoggingConfig, ReconnectConfig, RetryConfig, ServerConfig, SyncConfig,
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
    pub retry: RetryConfig,
    pub reconnect: ReconnectConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. WP_CONFIG_DIR env var, else ./.wp/
    /// 2. Auto-create the config directory
    /// 3. Load config.toml if it exists, else defaults
    /// 4. Apply WP_* environment variable overrides
    /// 5. Warn about a stray ~/.wp/config.toml that is not being read
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Self::warn_on_home_config(&config_path);

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn warn_on_home_config(active: &Path) {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let home_config = home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if home_config != active && home_config.exists() {
            warn!(
                "Ignoring {} - config is read from {}",
                home_config.display(),
                active.display()
            );
        }
    }

    /// Get the config directory.
    /// Priority: WP_CONFIG_DIR env var > ./.wp/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let config_dir = Self::config_dir()?;

        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&config_dir)?;
        self.sync.validate()?;
        self.retry.validate()?;
        self.reconnect.validate()?;

        Ok(())
    }

    /// Get absolute path to the database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    /// Get absolute path to the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(ref filename) = self.logging.file else {
            return Ok(None);
        };
        Ok(Some(
            Self::config_dir()?.join(&self.logging.dir).join(filename),
        ))
    }

    pub fn bind_addr(&self) -> String {
        self.server.bind_addr()
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {} (max {} streams, {} concurrent catch-up requests)",
            self.server.bind_addr(),
            self.server.max_streams,
            self.server.max_connections
        );
        info!("  database: {}", self.database.path);
        info!(
            "  auth: {} ({})",
            if self.auth.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.auth.algorithm()
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  sync: backend={}, retention={} / {}s, catch_up_cap={}, poll={}ms",
            self.sync.backend,
            self.sync.retention_count,
            self.sync.retention_window_secs,
            self.sync.catch_up_cap,
            self.sync.poll_interval_ms
        );
        info!(
            "  sync: channel_capacity={}, trim_interval={}s, keep_alive={}s",
            self.sync.channel_capacity, self.sync.trim_interval_secs, self.sync.keep_alive_secs
        );
        info!(
            "  retry: attempts={}, initial={}ms, max={}s, backoff={}x (worst case {:?})",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_secs,
            self.retry.backoff_multiplier,
            self.retry.worst_case_wait()
        );
        info!(
            "  reconnect: initial={}ms, max={}s, backoff={}x",
            self.reconnect.initial_delay_ms,
            self.reconnect.max_delay_secs,
            self.reconnect.backoff_multiplier
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("WP_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("WP_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse("WP_SERVER_MAX_STREAMS", &mut self.server.max_streams);
        Self::apply_env_parse(
            "WP_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Database
        Self::apply_env_string("WP_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_bool("WP_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("WP_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_option_string(
            "WP_AUTH_JWT_PUBLIC_KEY_PATH",
            &mut self.auth.jwt_public_key_path,
        );
        Self::apply_env_string(
            "WP_AUTH_DEFAULT_TENANT_ID",
            &mut self.auth.default_tenant_id,
        );
        Self::apply_env_string("WP_AUTH_DEFAULT_ACTOR_ID", &mut self.auth.default_actor_id);

        // Logging
        Self::apply_env_parse("WP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("WP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("WP_LOG_FILE", &mut self.logging.file);

        // Sync
        Self::apply_env_parse("WP_SYNC_BACKEND", &mut self.sync.backend);
        Self::apply_env_parse(
            "WP_SYNC_RETENTION_COUNT",
            &mut self.sync.retention_count,
        );
        Self::apply_env_parse(
            "WP_SYNC_RETENTION_WINDOW_SECS",
            &mut self.sync.retention_window_secs,
        );
        Self::apply_env_parse("WP_SYNC_CATCH_UP_CAP", &mut self.sync.catch_up_cap);
        Self::apply_env_parse(
            "WP_SYNC_POLL_INTERVAL_MS",
            &mut self.sync.poll_interval_ms,
        );
        Self::apply_env_parse(
            "WP_SYNC_CHANNEL_CAPACITY",
            &mut self.sync.channel_capacity,
        );
        Self::apply_env_parse(
            "WP_SYNC_TRIM_INTERVAL_SECS",
            &mut self.sync.trim_interval_secs,
        );
        Self::apply_env_parse(
            "WP_SYNC_KEEP_ALIVE_SECS",
            &mut self.sync.keep_alive_secs,
        );

        // Retry
        Self::apply_env_parse("WP_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "WP_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("WP_RETRY_MAX_DELAY_SECS", &mut self.retry.max_delay_secs);
        Self::apply_env_parse(
            "WP_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("WP_RETRY_JITTER", &mut self.retry.jitter);

        // Reconnect
        Self::apply_env_parse(
            "WP_RECONNECT_INITIAL_DELAY_MS",
            &mut self.reconnect.initial_delay_ms,
        );
        Self::apply_env_parse(
            "WP_RECONNECT_MAX_DELAY_SECS",
            &mut self.reconnect.max_delay_secs,
        );
        Self::apply_env_parse(
            "WP_RECONNECT_BACKOFF_MULTIPLIER",
            &mut self.reconnect.backoff_multiplier,
        );
        Self::apply_env_bool("WP_RECONNECT_JITTER", &mut self.reconnect.jitter);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
