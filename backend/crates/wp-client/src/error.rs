use wp_core::Cursor;
use wp_sync::SyncError;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors that can occur while following a tenant's change stream
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (code: {code}) {location}")]
    Api {
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cursor store I/O error at {}: {source} {location}", path.display())]
    Io {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    /// History after the cursor is gone; a full refresh is required
    #[error("Stale cursor {cursor:?} {location}")]
    StaleCursor {
        cursor: Option<Cursor>,
        location: ErrorLocation,
    },

    /// The stream delivered data for another tenant
    #[error("Tenant mismatch: {message} {location}")]
    TenantMismatch {
        message: String,
        location: ErrorLocation,
    },

    /// Transport failed or the backend was unreachable; safe to reconnect
    #[error("Disconnected: {message} {location}")]
    Disconnected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Sync error: {source} {location}")]
    Sync {
        location: ErrorLocation,
        #[source]
        source: SyncError,
    },
}

impl ClientError {
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn api_error(code: String, message: String) -> Self {
        match code.as_str() {
            "STALE_CURSOR" => ClientError::StaleCursor {
                cursor: None,
                location: ErrorLocation::from(Location::caller()),
            },
            "TENANT_MISMATCH" => ClientError::TenantMismatch {
                message,
                location: ErrorLocation::from(Location::caller()),
            },
            _ => ClientError::Api {
                code,
                message,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }

    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClientError::Io {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn disconnected<S: Into<String>>(message: S) -> Self {
        ClientError::Disconnected {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transient failures worth reconnecting for
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http { .. } | ClientError::Disconnected { .. } => true,
            ClientError::Api { code, .. } => {
                matches!(
                    code.as_str(),
                    "BROADCAST_UNAVAILABLE" | "SERVICE_UNAVAILABLE" | "INTERNAL_ERROR"
                )
            }
            ClientError::Sync { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

impl From<SyncError> for ClientError {
    #[track_caller]
    fn from(err: SyncError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match err {
            SyncError::StaleCursor { cursor, .. } => ClientError::StaleCursor {
                cursor: Some(cursor),
                location,
            },
            SyncError::TenantMismatch { .. } => ClientError::TenantMismatch {
                message: err.to_string(),
                location,
            },
            other => ClientError::Sync {
                location,
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
