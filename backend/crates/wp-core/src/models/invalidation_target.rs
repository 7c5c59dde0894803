use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque name of a cached query result (e.g. `guests.list`) that becomes
/// stale when a matching envelope arrives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvalidationTarget(String);

impl InvalidationTarget {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvalidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InvalidationTarget {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
