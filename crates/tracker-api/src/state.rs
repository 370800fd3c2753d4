//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use tracker_core::TrackerConfig;
use tracker_plugin::ActivityPlugin;
use tracker_store::ActivityStore;

/// Shared application state.
///
/// Cloned into every handler task; all fields are cheap to clone. The store
/// is the same instance the plugin wraps.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed at startup.
    pub config: Arc<TrackerConfig>,
    /// The activity store.
    pub store: Arc<dyn ActivityStore>,
    /// Function-calling adapter over `store`.
    pub plugin: ActivityPlugin,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: TrackerConfig, store: Arc<dyn ActivityStore>) -> Self {
        let plugin = ActivityPlugin::new(Arc::clone(&store));
        Self {
            config: Arc::new(config),
            store,
            plugin,
            start_time: Instant::now(),
        }
    }
}
