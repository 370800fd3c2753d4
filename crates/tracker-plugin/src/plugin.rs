//! The activity plugin: string-level operations over an `ActivityStore`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracker_core::{parse_activity_id, ActivityStatus};
use tracker_store::{ActivityQuery, ActivityStore, ActivityUpdate};

use crate::response;

/// Adapter between loosely-typed function-calling arguments and the store.
///
/// Holds no state of its own. Every method returns a complete message and
/// reports bad input in that message instead of failing.
#[derive(Clone)]
pub struct ActivityPlugin {
    store: Arc<dyn ActivityStore>,
}

impl ActivityPlugin {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Create an activity. `scheduled_at` is already parsed by the caller.
    pub fn create_activity(
        &self,
        title: &str,
        description: Option<&str>,
        scheduled_at: DateTime<Utc>,
    ) -> String {
        let activity =
            self.store
                .create(title.to_string(), description.map(str::to_string), scheduled_at);
        response::created(&activity)
    }

    /// List activities, optionally filtered by status.
    ///
    /// An absent, empty, or unrecognized status lists everything.
    pub fn get_activities(&self, status: Option<&str>) -> String {
        let mut query = ActivityQuery::all();
        if let Some(parsed) = status.and_then(|s| s.parse::<ActivityStatus>().ok()) {
            query = query.with_status(parsed);
        } else if let Some(raw) = status.filter(|s| !s.trim().is_empty()) {
            tracing::debug!(status = %raw, "Unrecognized status filter ignored");
        }

        let activities = self.store.get_all(&query);
        response::listing(&activities)
    }

    pub fn get_activity_by_id(&self, id: &str) -> String {
        let Ok(uuid) = parse_activity_id(id) else {
            return response::INVALID_ID.to_string();
        };

        match self.store.get_by_id(uuid) {
            Some(activity) => response::details(&activity),
            None => response::not_found(id),
        }
    }

    /// Update the supplied fields of an activity.
    ///
    /// Unlike `get_activities`, a status that is present but unrecognized is
    /// rejected before the store is touched.
    pub fn update_activity(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
        scheduled_at: Option<DateTime<Utc>>,
        status: Option<&str>,
    ) -> String {
        let Ok(uuid) = parse_activity_id(id) else {
            return response::INVALID_ID.to_string();
        };

        let status = match status.filter(|s| !s.trim().is_empty()) {
            Some(raw) => match raw.parse::<ActivityStatus>() {
                Ok(parsed) => Some(parsed),
                Err(_) => return response::invalid_status(raw),
            },
            None => None,
        };

        let update = ActivityUpdate {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            scheduled_at,
            status,
        };

        match self.store.update(uuid, update) {
            Some(activity) => response::updated(&activity),
            None => response::not_found(id),
        }
    }

    pub fn delete_activity(&self, id: &str) -> String {
        let Ok(uuid) = parse_activity_id(id) else {
            return response::INVALID_ID.to_string();
        };

        if self.store.delete(uuid) {
            response::deleted(id)
        } else {
            response::not_found(id)
        }
    }
}
