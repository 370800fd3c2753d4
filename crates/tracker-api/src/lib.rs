//! Tracker API crate - axum HTTP server and route handlers.
//!
//! Provides the REST API for the activity tracker: activity CRUD under
//! `/api/activities`, the function-calling plugin under `/api/plugin`, and
//! a health check.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
