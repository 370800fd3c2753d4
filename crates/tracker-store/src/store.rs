//! The storage contract for activities.

use chrono::{DateTime, Utc};
use tracker_core::{Activity, ActivityStatus};
use uuid::Uuid;

use crate::query::ActivityQuery;

/// Partial update for an activity.
///
/// `None` leaves the field unchanged; `Some` overwrites it, including with
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<ActivityStatus>,
}

impl ActivityUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.scheduled_at.is_none()
            && self.status.is_none()
    }

    /// Apply the supplied fields to `activity` and stamp `updated_at`.
    ///
    /// `updated_at` is set even when no field is supplied, and never moves
    /// before `created_at` or the previous `updated_at`.
    pub fn apply(self, activity: &mut Activity, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            activity.title = title;
        }
        if let Some(description) = self.description {
            activity.description = Some(description);
        }
        if let Some(scheduled_at) = self.scheduled_at {
            activity.scheduled_at = scheduled_at;
        }
        if let Some(status) = self.status {
            activity.status = status;
        }
        let floor = activity.updated_at.unwrap_or(activity.created_at);
        activity.updated_at = Some(now.max(floor));
    }
}

/// Keyed store of live activities.
///
/// Every operation is total: misses are reported as `None`/`false`, never
/// as errors. Implementations synchronize internally.
pub trait ActivityStore: Send + Sync {
    /// Store a new activity with a fresh id, `Pending` status, and
    /// `created_at = now`.
    fn create(
        &self,
        title: String,
        description: Option<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Activity;

    fn get_by_id(&self, id: Uuid) -> Option<Activity>;

    /// Activities matching `query`, ordered by `scheduled_at` ascending.
    fn get_all(&self, query: &ActivityQuery) -> Vec<Activity>;

    /// Apply `update` to the activity with `id`. Returns the updated record,
    /// or `None` if no such activity exists.
    fn update(&self, id: Uuid, update: ActivityUpdate) -> Option<Activity>;

    /// Remove the activity with `id`. Returns whether anything was removed.
    fn delete(&self, id: Uuid) -> bool;

    /// Number of live activities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
