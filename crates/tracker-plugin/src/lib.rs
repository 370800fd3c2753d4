//! Function-calling plugin for the activity tracker.
//!
//! Exposes the activity store to an LLM function-calling runtime: five
//! string-in, string-out functions, their catalog, and a dispatcher that
//! decodes JSON arguments. Every call yields a complete human-readable
//! message; failures are reported in the message, never as errors.

pub mod error;
pub mod functions;
pub mod plugin;
pub mod response;

#[cfg(test)]
mod fake;

pub use error::PluginError;
pub use functions::{FunctionDefinition, FunctionName, FunctionParameter};
pub use plugin::ActivityPlugin;
