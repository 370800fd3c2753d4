//! In-memory activity store backed by a sharded concurrent map.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracker_core::{Activity, ActivityStatus};
use uuid::Uuid;

use crate::query::{schedule_order, ActivityQuery};
use crate::store::{ActivityStore, ActivityUpdate};

/// Process-lifetime activity store.
///
/// Each key's mutations run under its shard's write guard, so readers see
/// either the whole pre-update or the whole post-update record. Listing
/// clones matching records shard by shard and sorts the copy.
pub struct InMemoryActivityStore {
    activities: DashMap<Uuid, Activity>,
}

impl InMemoryActivityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            activities: DashMap::new(),
        }
    }
}

impl Default for InMemoryActivityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityStore for InMemoryActivityStore {
    fn create(
        &self,
        title: String,
        description: Option<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Activity {
        let mut activity = Activity {
            id: Uuid::new_v4(),
            title,
            description,
            scheduled_at,
            status: ActivityStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };

        loop {
            match self.activities.entry(activity.id) {
                Entry::Vacant(slot) => {
                    slot.insert(activity.clone());
                    break;
                }
                Entry::Occupied(_) => {
                    tracing::warn!(id = %activity.id, "Activity id collision, regenerating");
                    activity.id = Uuid::new_v4();
                }
            }
        }

        tracing::debug!(id = %activity.id, title = %activity.title, "Activity created");
        activity
    }

    fn get_by_id(&self, id: Uuid) -> Option<Activity> {
        self.activities.get(&id).map(|entry| entry.value().clone())
    }

    fn get_all(&self, query: &ActivityQuery) -> Vec<Activity> {
        let mut result: Vec<Activity> = if query.is_unfiltered() {
            self.activities
                .iter()
                .map(|entry| entry.value().clone())
                .collect()
        } else {
            self.activities
                .iter()
                .filter(|entry| query.matches(entry.value()))
                .map(|entry| entry.value().clone())
                .collect()
        };

        result.sort_by(schedule_order);
        result
    }

    fn update(&self, id: Uuid, update: ActivityUpdate) -> Option<Activity> {
        let touch_only = update.is_empty();
        let mut entry = self.activities.get_mut(&id)?;
        update.apply(entry.value_mut(), Utc::now());
        let updated = entry.value().clone();
        drop(entry);

        tracing::debug!(id = %id, status = %updated.status, touch_only, "Activity updated");
        Some(updated)
    }

    fn delete(&self, id: Uuid) -> bool {
        let removed = self.activities.remove(&id).is_some();
        if removed {
            tracing::debug!(id = %id, "Activity deleted");
        }
        removed
    }

    fn len(&self) -> usize {
        self.activities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn base_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    // --- create ---

    #[test]
    fn test_create_sets_properties() {
        let store = InMemoryActivityStore::new();
        let scheduled_at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        let activity = store.create(
            "Meeting".to_string(),
            Some("Team sync".to_string()),
            scheduled_at,
        );

        assert!(!activity.id.is_nil());
        assert_eq!(activity.title, "Meeting");
        assert_eq!(activity.description.as_deref(), Some("Team sync"));
        assert_eq!(activity.scheduled_at, scheduled_at);
        assert_eq!(activity.status, ActivityStatus::Pending);
        assert!(activity.created_at <= Utc::now());
        assert!(activity.updated_at.is_none());
    }

    #[test]
    fn test_create_without_description() {
        let store = InMemoryActivityStore::new();
        let activity = store.create("Task".to_string(), None, Utc::now() + Duration::days(1));
        assert!(activity.description.is_none());
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let store = InMemoryActivityStore::new();
        let ids: HashSet<Uuid> = (0..100)
            .map(|i| store.create(format!("T{}", i), None, base_date()).id)
            .collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(store.len(), 100);
    }

    // --- get_by_id ---

    #[test]
    fn test_get_by_id_existing() {
        let store = InMemoryActivityStore::new();
        let created = store.create("Test".to_string(), None, Utc::now());

        let found = store.get_by_id(created.id).unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_get_by_id_missing() {
        let store = InMemoryActivityStore::new();
        assert!(store.get_by_id(Uuid::new_v4()).is_none());
    }

    // --- get_all ---

    #[test]
    fn test_get_all_returns_every_activity_once() {
        let store = InMemoryActivityStore::new();
        let a = store.create("A".to_string(), None, Utc::now());
        let b = store.create("B".to_string(), None, Utc::now());
        let c = store.create("C".to_string(), None, Utc::now());

        let result = store.get_all(&ActivityQuery::all());
        assert_eq!(result.len(), 3);
        let ids: HashSet<Uuid> = result.iter().map(|x| x.id).collect();
        assert_eq!(ids, HashSet::from([a.id, b.id, c.id]));
    }

    #[test]
    fn test_get_all_orders_by_scheduled_at() {
        let store = InMemoryActivityStore::new();
        store.create("Third".to_string(), None, base_date() + Duration::days(3));
        store.create("First".to_string(), None, base_date() + Duration::days(1));
        store.create("Second".to_string(), None, base_date() + Duration::days(2));

        let titles: Vec<String> = store
            .get_all(&ActivityQuery::all())
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_get_all_ties_keep_creation_order() {
        let store = InMemoryActivityStore::new();
        let first = store.create("First".to_string(), None, base_date());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create("Second".to_string(), None, base_date());

        let result = store.get_all(&ActivityQuery::all());
        assert_eq!(result[0].id, first.id);
        assert_eq!(result[1].id, second.id);
    }

    #[test]
    fn test_get_all_filter_by_status() {
        let store = InMemoryActivityStore::new();
        store.create("Pending1".to_string(), None, Utc::now());
        let completed = store.create("Completed1".to_string(), None, Utc::now());
        store.update(
            completed.id,
            ActivityUpdate {
                status: Some(ActivityStatus::Completed),
                ..Default::default()
            },
        );

        let result = store.get_all(&ActivityQuery::all().with_status(ActivityStatus::Completed));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Completed1");

        let pending = store.get_all(&ActivityQuery::all().with_status(ActivityStatus::Pending));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Pending1");
    }

    #[test]
    fn test_get_all_scheduled_after_is_inclusive() {
        let store = InMemoryActivityStore::new();
        store.create("Before".to_string(), None, cutoff() - Duration::days(1));
        store.create("On".to_string(), None, cutoff());
        store.create("After".to_string(), None, cutoff() + Duration::days(1));

        let result = store.get_all(&ActivityQuery::all().scheduled_after(cutoff()));
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.scheduled_at >= cutoff()));
        assert_eq!(result[0].title, "On");
    }

    #[test]
    fn test_get_all_scheduled_before_is_inclusive() {
        let store = InMemoryActivityStore::new();
        store.create("Before".to_string(), None, cutoff() - Duration::days(1));
        store.create("On".to_string(), None, cutoff());
        store.create("After".to_string(), None, cutoff() + Duration::days(1));

        let result = store.get_all(&ActivityQuery::all().scheduled_before(cutoff()));
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.scheduled_at <= cutoff()));
        assert_eq!(result[1].title, "On");
    }

    #[test]
    fn test_get_all_combined_window() {
        let store = InMemoryActivityStore::new();
        for day in 0..10 {
            store.create(format!("Day{}", day), None, base_date() + Duration::days(day));
        }

        let query = ActivityQuery::all()
            .scheduled_after(base_date() + Duration::days(3))
            .scheduled_before(base_date() + Duration::days(5));
        let titles: Vec<String> = store.get_all(&query).into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Day3", "Day4", "Day5"]);
    }

    #[test]
    fn test_get_all_no_matches_is_empty() {
        let store = InMemoryActivityStore::new();
        assert!(store
            .get_all(&ActivityQuery::all().with_status(ActivityStatus::Completed))
            .is_empty());

        store.create("Pending".to_string(), None, Utc::now());
        assert!(store
            .get_all(&ActivityQuery::all().with_status(ActivityStatus::Completed))
            .is_empty());
    }

    // --- update ---

    #[test]
    fn test_update_title_only() {
        let store = InMemoryActivityStore::new();
        let created = store.create("Original".to_string(), Some("Desc".to_string()), base_date());

        let updated = store
            .update(
                created.id,
                ActivityUpdate {
                    title: Some("New Title".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.description.as_deref(), Some("Desc"));
        assert_eq!(updated.scheduled_at, base_date());
        assert_eq!(updated.status, ActivityStatus::Pending);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_update_status_only() {
        let store = InMemoryActivityStore::new();
        let created = store.create("Task".to_string(), None, Utc::now());

        let updated = store
            .update(
                created.id,
                ActivityUpdate {
                    status: Some(ActivityStatus::InProgress),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Task");
        assert_eq!(updated.status, ActivityStatus::InProgress);
    }

    #[test]
    fn test_update_multiple_fields() {
        let store = InMemoryActivityStore::new();
        let new_date = Utc.with_ymd_and_hms(2026, 6, 15, 14, 0, 0).unwrap();
        let created = store.create("Old".to_string(), Some("Old desc".to_string()), base_date());

        let updated = store
            .update(
                created.id,
                ActivityUpdate {
                    title: Some("New".to_string()),
                    description: Some("New desc".to_string()),
                    scheduled_at: Some(new_date),
                    status: Some(ActivityStatus::Completed),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("New desc"));
        assert_eq!(updated.scheduled_at, new_date);
        assert_eq!(updated.status, ActivityStatus::Completed);
        assert_eq!(store.get_by_id(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_with_no_fields_touches_updated_at() {
        let store = InMemoryActivityStore::new();
        let created = store.create("Task".to_string(), Some("Desc".to_string()), base_date());

        let first = store.update(created.id, ActivityUpdate::default()).unwrap();
        let first_touch = first.updated_at.unwrap();
        assert!(first_touch >= created.created_at);

        let second = store.update(created.id, ActivityUpdate::default()).unwrap();
        assert!(second.updated_at.unwrap() >= first_touch);

        let mut unchanged = second.clone();
        unchanged.updated_at = None;
        assert_eq!(unchanged, created);
    }

    #[test]
    fn test_update_missing_returns_none() {
        let store = InMemoryActivityStore::new();
        let result = store.update(
            Uuid::new_v4(),
            ActivityUpdate {
                title: Some("Title".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_none());
        assert!(store.is_empty());
    }

    // --- delete ---

    #[test]
    fn test_delete_existing_removes() {
        let store = InMemoryActivityStore::new();
        let created = store.create("ToDelete".to_string(), None, Utc::now());

        assert!(store.delete(created.id));
        assert!(store.get_by_id(created.id).is_none());
        assert!(store.get_all(&ActivityQuery::all()).is_empty());
        assert!(store.update(created.id, ActivityUpdate::default()).is_none());
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let store = InMemoryActivityStore::new();
        assert!(!store.delete(Uuid::new_v4()));
    }

    #[test]
    fn test_delete_twice() {
        let store = InMemoryActivityStore::new();
        let created = store.create("Once".to_string(), None, Utc::now());
        assert!(store.delete(created.id));
        assert!(!store.delete(created.id));
    }

    // --- concurrency ---

    #[test]
    fn test_concurrent_creates_never_collide() {
        let store = Arc::new(InMemoryActivityStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|i| store.create(format!("T{}-{}", t, i), None, base_date()).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(ids.len(), 2000);
        assert_eq!(store.len(), 2000);
    }

    #[test]
    fn test_concurrent_updates_same_key_last_writer_wins() {
        let store = Arc::new(InMemoryActivityStore::new());
        let created = store.create("Start".to_string(), None, base_date());
        let titles: Vec<String> = (0..8).map(|i| format!("Writer{}", i)).collect();

        let handles: Vec<_> = titles
            .iter()
            .cloned()
            .map(|title| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(
                            created.id,
                            ActivityUpdate {
                                title: Some(title.clone()),
                                description: Some(title.clone()),
                                ..Default::default()
                            },
                        );
                    }
                })
            })
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = store.get_by_id(created.id).unwrap();
                    if let Some(description) = snapshot.description {
                        assert_eq!(snapshot.title, description, "torn record observed");
                    }
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        reader.join().unwrap();

        let last = store.get_by_id(created.id).unwrap();
        assert!(titles.contains(&last.title));
        assert_eq!(last.description.as_deref(), Some(last.title.as_str()));
        assert!(last.updated_at.is_some());
    }

    #[test]
    fn test_concurrent_delete_removes_exactly_once() {
        let store = Arc::new(InMemoryActivityStore::new());
        let created = store.create("Contested".to_string(), None, base_date());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.delete(created.id))
            })
            .collect();

        let removals = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|removed| *removed)
            .count();
        assert_eq!(removals, 1);
        assert!(store.is_empty());
    }
}
