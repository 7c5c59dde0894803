use crate::{CoreError, CoreResult, ErrorLocation};

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique envelope identifier, assigned at publish time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeId(Uuid);

impl EnvelopeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[track_caller]
    pub fn parse(value: &str) -> CoreResult<Self> {
        let uuid = Uuid::parse_str(value).map_err(|source| CoreError::Uuid {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(Self(uuid))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EnvelopeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
