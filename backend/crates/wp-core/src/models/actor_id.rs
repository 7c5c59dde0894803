use crate::{CoreError, CoreResult, MAX_IDENTIFIER_LENGTH};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session that caused a change. Only equality matters: it is what
/// suppresses echoing a change back to its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[track_caller]
    pub fn parse(value: &str) -> CoreResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("actor_id", "actor_id cannot be empty"));
        }
        if trimmed.len() > MAX_IDENTIFIER_LENGTH {
            return Err(CoreError::validation(
                "actor_id",
                format!("actor_id exceeds {} characters", MAX_IDENTIFIER_LENGTH),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
