//! Argument-decoding failures for plugin function invocation.
//!
//! These never escape `ActivityPlugin::invoke`; their `Display` text is the
//! message handed back to the caller.

/// Errors raised while decoding function-calling arguments.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("Unknown function: '{0}'. Available functions are: CreateActivity, GetActivities, GetActivityById, UpdateActivity, DeleteActivity.")]
    UnknownFunction(String),
    #[error("Arguments must be a JSON object.")]
    ArgumentsNotObject,
    #[error("Missing required argument '{0}'.")]
    MissingArgument(&'static str),
    #[error("Argument '{name}' must be a {expected}.")]
    InvalidArgumentType {
        name: &'static str,
        expected: &'static str,
    },
    #[error("Invalid {name}: '{value}'. Use ISO 8601 format, e.g. 2026-03-01T10:00:00Z.")]
    InvalidTimestamp { name: &'static str, value: String },
}
