use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Reasons a sync request could not be tied to a tenant session.
///
/// All of them surface as 401 at the HTTP edge; `InvalidKey` only happens
/// while the server is starting.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header {location}")]
    MissingHeader { location: ErrorLocation },

    #[error("Authorization header is not a Bearer token {location}")]
    InvalidScheme { location: ErrorLocation },

    #[error("Invalid session token: {message} {location}")]
    InvalidToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Session token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Session token rejected: {source} {location}")]
    JwtDecode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    /// Signature was fine but the tenant or actor claim is unusable
    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },

    /// The configured verification key could not be loaded
    #[error("Invalid verification key: {message} {location}")]
    InvalidKey {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    #[track_caller]
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::InvalidToken {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_claim<S: Into<String>>(claim: &str, message: S) -> Self {
        Self::InvalidClaim {
            claim: claim.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_key<S: Into<String>>(message: S) -> Self {
        Self::InvalidKey {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn expired() -> Self {
        Self::TokenExpired {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable code for API error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHeader { .. } => "MISSING_AUTH_HEADER",
            Self::InvalidScheme { .. } => "INVALID_AUTH_SCHEME",
            Self::InvalidToken { .. } | Self::JwtDecode { .. } => "INVALID_TOKEN",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::InvalidClaim { .. } => "INVALID_CLAIM",
            Self::InvalidKey { .. } => "AUTH_MISCONFIGURED",
        }
    }

    /// Message safe to return to a client: no source location, no key details
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingHeader { .. } => "missing authorization header".to_string(),
            Self::InvalidScheme { .. } => "expected a Bearer token".to_string(),
            Self::TokenExpired { .. } => "session token expired, sign in again".to_string(),
            Self::InvalidToken { message, .. } | Self::InvalidClaim { message, .. } => {
                message.clone()
            }
            Self::JwtDecode { source, .. } => source.to_string(),
            Self::InvalidKey { .. } => "authentication is misconfigured".to_string(),
        }
    }

    /// Claim that failed validation, reported as the error's `field`
    pub fn field(&self) -> Option<String> {
        match self {
            Self::InvalidClaim { claim, .. } => Some(claim.clone()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
