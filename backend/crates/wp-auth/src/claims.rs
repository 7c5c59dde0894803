use crate::{AuthError, Result as AuthErrorResult};

use wp_core::MAX_IDENTIFIER_LENGTH;

use serde::{Deserialize, Serialize};

/// JWT claims issued by the session service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the acting user/session
    pub sub: String,
    pub tenant_id: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        Self::check("tenant_id", &self.tenant_id)?;
        Self::check("sub", &self.sub)?;
        Ok(())
    }

    #[track_caller]
    fn check(claim: &str, value: &str) -> AuthErrorResult<()> {
        if value.trim().is_empty() {
            return Err(AuthError::invalid_claim(claim, format!("{claim} cannot be empty")));
        }
        if value.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AuthError::invalid_claim(
                claim,
                format!("{claim} exceeds {MAX_IDENTIFIER_LENGTH} characters"),
            ));
        }
        Ok(())
    }
}
