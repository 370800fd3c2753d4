pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use time::{format_timestamp, parse_timestamp};
pub use types::*;
