use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::TrackerError;

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of an activity.
///
/// Rendered with its canonical casing (`InProgress`), parsed
/// case-insensitively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ActivityStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ActivityStatus {
    /// Every status, in declaration order.
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::Pending,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "Pending",
            ActivityStatus::InProgress => "InProgress",
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Cancelled => "Cancelled",
        }
    }

    /// Comma-separated list of the accepted names, for error messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TrackerError::InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// A scheduled activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parse the textual form of an activity id.
///
/// Accepts any form `Uuid::parse_str` understands, with surrounding
/// whitespace ignored.
pub fn parse_activity_id(text: &str) -> Result<Uuid, TrackerError> {
    Uuid::parse_str(text.trim()).map_err(|_| TrackerError::InvalidId(text.to_string()))
}
