use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ACTOR_ID, DEFAULT_AUTH_ENABLED, DEFAULT_TENANT_ID,
    MIN_JWT_SECRET_LENGTH,
};

use std::path::Path;

use serde::Deserialize;

/// Session authentication settings.
///
/// With `enabled = false` the server trusts `X-Tenant-Id` / `X-Actor-Id`
/// headers and falls back to `default_tenant_id` / `default_actor_id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// HS256 shared secret (at least 32 characters)
    pub jwt_secret: Option<String>,
    /// RS256 public key PEM, relative to the config directory
    pub jwt_public_key_path: Option<String>,
    pub default_tenant_id: String,
    pub default_actor_id: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTH_ENABLED,
            jwt_secret: None,
            jwt_public_key_path: None,
            default_tenant_id: String::from(DEFAULT_TENANT_ID),
            default_actor_id: String::from(DEFAULT_ACTOR_ID),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self, config_dir: &Path) -> ConfigErrorResult<()> {
        if self.default_tenant_id.trim().is_empty() {
            return Err(ConfigError::auth("auth.default_tenant_id cannot be empty"));
        }

        if self.default_actor_id.trim().is_empty() {
            return Err(ConfigError::auth("auth.default_actor_id cannot be empty"));
        }

        if !self.enabled {
            return Ok(());
        }

        match (&self.jwt_secret, &self.jwt_public_key_path) {
            (Some(secret), _) => {
                if secret.len() < MIN_JWT_SECRET_LENGTH {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_secret must be at least {} characters",
                        MIN_JWT_SECRET_LENGTH
                    )));
                }
            }
            (None, Some(key_path)) => {
                let full_path = config_dir.join(key_path);
                if !full_path.exists() {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_public_key_path not found: {}",
                        full_path.display()
                    )));
                }
            }
            (None, None) => {
                return Err(ConfigError::auth(
                    "auth.enabled requires auth.jwt_secret or auth.jwt_public_key_path",
                ));
            }
        }

        Ok(())
    }

    /// Algorithm label for logging; never includes key material.
    pub fn algorithm(&self) -> &'static str {
        if self.jwt_secret.is_some() {
            "HS256"
        } else if self.jwt_public_key_path.is_some() {
            "RS256"
        } else {
            "none"
        }
    }
}
