use crate::{CoreError, CoreResult, MAX_IDENTIFIER_LENGTH};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Multi-tenant isolation boundary. Every broadcast backend operation is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a tenant id coming from an untrusted source (query string, header)
    #[track_caller]
    pub fn parse(value: &str) -> CoreResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("tenant_id", "tenant_id cannot be empty"));
        }
        if trimmed.len() > MAX_IDENTIFIER_LENGTH {
            return Err(CoreError::validation(
                "tenant_id",
                format!("tenant_id exceeds {} characters", MAX_IDENTIFIER_LENGTH),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
