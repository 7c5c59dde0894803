use crate::SyncError;

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

/// Identifies one transport stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[track_caller]
    pub fn parse(value: &str) -> Result<Self, SyncError> {
        let uuid = Uuid::parse_str(value).map_err(|_| SyncError::Validation {
            message: format!("Invalid connection_id: {}", value),
            field: Some("connection_id".to_string()),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(Self(uuid))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
