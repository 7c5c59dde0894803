//! REST API error types
//!
//! Every failure a sync endpoint returns is rendered as
//! `{ "error": { "code", "message" } }` with a matching HTTP status.

use wp_auth::AuthError;
use wp_core::{CoreError, Cursor};
use wp_sync::SyncError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "STALE_CURSOR", "VALIDATION_ERROR")
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Rejected cursor, only for `STALE_CURSOR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials (401)
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Request names a tenant other than the session's (403)
    #[error("Tenant mismatch: {message} {location}")]
    TenantMismatch {
        message: String,
        location: ErrorLocation,
    },

    /// History after the cursor is gone; the client must reset (410)
    #[error("Stale cursor {cursor}: {message} {location}")]
    StaleCursor {
        cursor: Cursor,
        message: String,
        location: ErrorLocation,
    },

    /// Validation error (400)
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// Broadcast backend unreachable (503)
    #[error("Service unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    /// Stream slots exhausted (503)
    #[error("Overloaded: {message} {location}")]
    Overloaded {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn validation<S: Into<String>>(field: &str, message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn tenant_mismatch<S: Into<String>>(message: S) -> Self {
        Self::TenantMismatch {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::TenantMismatch { .. } => StatusCode::FORBIDDEN,
            Self::StaleCursor { .. } => StatusCode::GONE,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unavailable { .. } | Self::Overloaded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { code, .. } => *code,
            Self::TenantMismatch { .. } => "TENANT_MISMATCH",
            Self::StaleCursor { .. } => "STALE_CURSOR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unavailable { .. } => "BROADCAST_UNAVAILABLE",
            Self::Overloaded { .. } => "SERVICE_UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Response body without the location suffix
    pub fn body(&self) -> ApiErrorBody {
        let (message, field, cursor) = match self {
            Self::Unauthorized { message, .. }
            | Self::TenantMismatch { message, .. }
            | Self::Unavailable { message, .. }
            | Self::Overloaded { message, .. }
            | Self::Internal { message, .. } => (message.clone(), None, None),
            Self::StaleCursor {
                cursor, message, ..
            } => (message.clone(), None, Some(*cursor)),
            Self::Validation { message, field, .. } => (message.clone(), field.clone(), None),
        };

        ApiErrorBody {
            code: self.code().to_string(),
            message,
            field,
            cursor,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.status() {
            s if s.is_server_error() => log::error!("{}", self),
            _ => log::warn!("{}", self),
        }

        let status = self.status();
        (status, Json(ApiErrorResponse { error: self.body() })).into_response()
    }
}

impl From<SyncError> for ApiError {
    #[track_caller]
    fn from(e: SyncError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            SyncError::StaleCursor { cursor, reason, .. } => ApiError::StaleCursor {
                cursor,
                message: reason,
                location,
            },
            SyncError::TenantMismatch {
                expected, actual, ..
            } => ApiError::TenantMismatch {
                message: format!("session tenant {} cannot access tenant {}", expected, actual),
                location,
            },
            SyncError::Validation { message, field, .. } => ApiError::Validation {
                message,
                field,
                location,
            },
            SyncError::BroadcastUnavailable { message, .. } => ApiError::Unavailable {
                message,
                location,
            },
            SyncError::Serialization { source, .. } => {
                // Don't expose payload details to clients
                log::error!("Envelope serialization error: {}", source);
                ApiError::Internal {
                    message: "Envelope serialization failed".to_string(),
                    location,
                }
            }
            SyncError::Internal { message, .. } => ApiError::Internal { message, location },
        }
    }
}

impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized {
            code: e.error_code(),
            message: e.client_message(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            CoreError::InvalidCursor { value, .. } => ApiError::Validation {
                message: format!("invalid cursor: {}", value),
                field: Some("since".to_string()),
                location,
            },
            CoreError::Validation { message, field, .. } => ApiError::Validation {
                message,
                field,
                location,
            },
            other => ApiError::Validation {
                message: other.to_string(),
                field: None,
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
