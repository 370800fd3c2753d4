//! Recording store for plugin tests.
//!
//! Delegates to a real `InMemoryActivityStore` and records every call made
//! through the `ActivityStore` trait. Seeding bypasses the recorder.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracker_core::Activity;
use tracker_store::{ActivityQuery, ActivityStore, ActivityUpdate, InMemoryActivityStore};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        title: String,
        description: Option<String>,
        scheduled_at: DateTime<Utc>,
    },
    GetById(Uuid),
    GetAll(ActivityQuery),
    Update(Uuid, ActivityUpdate),
    Delete(Uuid),
}

pub struct RecordingStore {
    inner: InMemoryActivityStore,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryActivityStore::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seed(&self, title: &str, scheduled_at: DateTime<Utc>) -> Activity {
        self.inner.create(title.to_string(), None, scheduled_at)
    }

    pub fn seed_with_description(
        &self,
        title: &str,
        description: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Activity {
        self.inner
            .create(title.to_string(), Some(description.to_string()), scheduled_at)
    }

    /// The single stored activity; panics if there is not exactly one.
    pub fn only_activity(&self) -> Activity {
        let all = self.inner.get_all(&ActivityQuery::all());
        assert_eq!(all.len(), 1, "expected exactly one stored activity");
        all.into_iter().next().unwrap()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ActivityStore for RecordingStore {
    fn create(
        &self,
        title: String,
        description: Option<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Activity {
        self.record(Call::Create {
            title: title.clone(),
            description: description.clone(),
            scheduled_at,
        });
        self.inner.create(title, description, scheduled_at)
    }

    fn get_by_id(&self, id: Uuid) -> Option<Activity> {
        self.record(Call::GetById(id));
        self.inner.get_by_id(id)
    }

    fn get_all(&self, query: &ActivityQuery) -> Vec<Activity> {
        self.record(Call::GetAll(*query));
        self.inner.get_all(query)
    }

    fn update(&self, id: Uuid, update: ActivityUpdate) -> Option<Activity> {
        self.record(Call::Update(id, update.clone()));
        self.inner.update(id, update)
    }

    fn delete(&self, id: Uuid) -> bool {
        self.record(Call::Delete(id));
        self.inner.delete(id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
