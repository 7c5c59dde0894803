use wp_core::{CoreError, Cursor, TenantId};
use wp_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Log or live channel unreachable; safe to retry, swallowed at the
    /// mutation boundary
    #[error("Broadcast backend unavailable: {message} {location}")]
    BroadcastUnavailable {
        message: String,
        location: ErrorLocation,
    },

    /// The subscriber missed history that can no longer be replayed
    #[error("Stale cursor {cursor}: {reason} {location}")]
    StaleCursor {
        cursor: Cursor,
        reason: String,
        location: ErrorLocation,
    },

    /// Cross-tenant access; never recoverable
    #[error("Tenant mismatch: expected {expected}, got {actual} {location}")]
    TenantMismatch {
        expected: TenantId,
        actual: TenantId,
        location: ErrorLocation,
    },

    #[error("Envelope serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl SyncError {
    #[track_caller]
    pub fn broadcast_unavailable<S: Into<String>>(message: S) -> Self {
        Self::BroadcastUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn stale_cursor<S: Into<String>>(cursor: Cursor, reason: S) -> Self {
        Self::StaleCursor {
            cursor,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn tenant_mismatch(expected: &TenantId, actual: &TenantId) -> Self {
        Self::TenantMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BroadcastUnavailable { .. } => "BROADCAST_UNAVAILABLE",
            Self::StaleCursor { .. } => "STALE_CURSOR",
            Self::TenantMismatch { .. } => "TENANT_MISMATCH",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BroadcastUnavailable { .. })
    }
}

impl From<CoreError> for SyncError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        let field = match &error {
            CoreError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        Self::Validation {
            message: error.to_string(),
            field,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for SyncError {
    #[track_caller]
    fn from(error: DbError) -> Self {
        match error {
            DbError::Serialization { source, .. } => Self::Serialization {
                source,
                location: ErrorLocation::from(Location::caller()),
            },
            other => Self::BroadcastUnavailable {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<serde_json::Error> for SyncError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
