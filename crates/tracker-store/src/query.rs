//! Filter set for listing activities.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracker_core::{Activity, ActivityStatus};

/// Conjunctive filters applied by `ActivityStore::get_all`.
///
/// Unset filters match everything. Both schedule bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    pub status: Option<ActivityStatus>,
    pub scheduled_after: Option<DateTime<Utc>>,
    pub scheduled_before: Option<DateTime<Utc>>,
}

impl ActivityQuery {
    /// A query with no filters.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ActivityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn scheduled_after(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_after = Some(at);
        self
    }

    pub fn scheduled_before(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_before = Some(at);
        self
    }

    /// True when no filter is set.
    pub fn is_unfiltered(&self) -> bool {
        self.status.is_none() && self.scheduled_after.is_none() && self.scheduled_before.is_none()
    }

    /// Whether `activity` passes every set filter.
    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(status) = self.status {
            if activity.status != status {
                return false;
            }
        }
        if let Some(after) = self.scheduled_after {
            if activity.scheduled_at < after {
                return false;
            }
        }
        if let Some(before) = self.scheduled_before {
            if activity.scheduled_at > before {
                return false;
            }
        }
        true
    }
}

/// Listing order: `scheduled_at` ascending, then creation time, then id.
pub fn schedule_order(a: &Activity, b: &Activity) -> Ordering {
    a.scheduled_at
        .cmp(&b.scheduled_at)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
