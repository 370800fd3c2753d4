use thiserror::Error;

/// Top-level error type for the activity tracker.
///
/// Store and plugin operations are total and never produce this type; it
/// covers configuration, startup, and the status and id parsers used at
/// the HTTP and function-calling boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid status: '{0}'")]
    InvalidStatus(String),

    #[error("Invalid activity ID: '{0}'")]
    InvalidId(String),
}

impl From<toml::de::Error> for TrackerError {
    fn from(err: toml::de::Error) -> Self {
        TrackerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TrackerError {
    fn from(err: toml::ser::Error) -> Self {
        TrackerError::Config(err.to_string())
    }
}

/// A specialized `Result` type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
