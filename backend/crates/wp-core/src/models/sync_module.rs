use crate::{CoreError, CoreResult, ErrorLocation};

use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical data domain a change belongs to.
///
/// Closed for matching purposes inside this workspace, but `non_exhaustive`
/// so new domains can be added without breaking downstream handlers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SyncModule {
    Clients,
    Weddings,
    Guests,
    Budget,
    Vendors,
    Documents,
    Tasks,
    Timeline,
    Seating,
    Payments,
    Contracts,
    Messages,
}

impl SyncModule {
    pub const ALL: [SyncModule; 12] = [
        Self::Clients,
        Self::Weddings,
        Self::Guests,
        Self::Budget,
        Self::Vendors,
        Self::Documents,
        Self::Tasks,
        Self::Timeline,
        Self::Seating,
        Self::Payments,
        Self::Contracts,
        Self::Messages,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Clients => "clients",
            Self::Weddings => "weddings",
            Self::Guests => "guests",
            Self::Budget => "budget",
            Self::Vendors => "vendors",
            Self::Documents => "documents",
            Self::Tasks => "tasks",
            Self::Timeline => "timeline",
            Self::Seating => "seating",
            Self::Payments => "payments",
            Self::Contracts => "contracts",
            Self::Messages => "messages",
        }
    }
}

impl FromStr for SyncModule {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSyncModule {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
