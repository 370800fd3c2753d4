//! Activity storage for the tracker.
//!
//! Defines the `ActivityStore` contract shared by the HTTP layer and the
//! function-calling plugin, and the in-memory implementation backing both.

pub mod memory;
pub mod query;
pub mod store;

pub use memory::InMemoryActivityStore;
pub use query::ActivityQuery;
pub use store::{ActivityStore, ActivityUpdate};
