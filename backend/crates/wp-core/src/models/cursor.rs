use crate::{CoreError, CoreResult, ErrorLocation};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// High-water mark: the timestamp (wall-clock milliseconds) of the most
/// recent envelope a subscriber has processed.
///
/// Log reads are always "strictly after" a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    /// Position before any envelope ever published
    pub const ORIGIN: Cursor = Cursor(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Cursor `millis` earlier than this one, never below the origin
    pub fn saturating_sub_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_sub(millis).max(0))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cursor {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        let millis: i64 = s.trim().parse().map_err(|_| CoreError::InvalidCursor {
            value: s.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if millis < 0 {
            return Err(CoreError::InvalidCursor {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(millis))
    }
}
