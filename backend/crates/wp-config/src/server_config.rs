use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
/// Port 0 lets the OS pick; anything else must be unprivileged
pub const MIN_PORT: u16 = 1024;

// Each open stream holds a live attachment for its tenant
pub const MIN_MAX_STREAMS: usize = 1;
pub const MAX_MAX_STREAMS: usize = 100_000;
pub const DEFAULT_MAX_STREAMS: usize = 10_000;

// Catch-up polls are short but each one reads up to `sync.catch_up_cap` rows
pub const MIN_MAX_CONNECTIONS: usize = 1;
pub const MAX_MAX_CONNECTIONS: usize = 10_000;
pub const DEFAULT_MAX_CONNECTIONS: usize = 512;

/// HTTP surface serving `/sync/stream` and `/sync/changes`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open `/sync/stream` responses allowed at once; further opens get 503
    pub max_streams: usize,
    /// Concurrent `/sync/changes` requests
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            max_streams: DEFAULT_MAX_STREAMS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::config("server.host cannot be empty"));
        }

        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::config(format!(
                "server.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        check_range(
            "server.max_streams",
            self.max_streams,
            MIN_MAX_STREAMS,
            MAX_MAX_STREAMS,
        )?;
        check_range(
            "server.max_connections",
            self.max_connections,
            MIN_MAX_CONNECTIONS,
            MAX_MAX_CONNECTIONS,
        )
    }
}

fn check_range(name: &str, value: usize, min: usize, max: usize) -> ConfigErrorResult<()> {
    if value < min || value > max {
        return Err(ConfigError::config(format!(
            "{} must be {}-{}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}
