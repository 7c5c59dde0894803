use crate::ErrorLocation;

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Invalid change kind: {value} {location}")]
    InvalidChangeKind {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid sync module: {value} {location}")]
    InvalidSyncModule {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid cursor: {value} {location}")]
    InvalidCursor {
        value: String,
        location: ErrorLocation,
    },

    #[error("UUID parse error: {source} {location}")]
    Uuid {
        #[source]
        source: uuid::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Create a validation error for a named field
    #[track_caller]
    pub fn validation<S: Into<String>>(field: &str, message: S) -> Self {
        CoreError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
