//! Function catalog and JSON-argument dispatch.
//!
//! The catalog describes each plugin function the way function-calling
//! runtimes expect (name, description, JSON-Schema parameters). `invoke`
//! decodes an argument object and routes it to the matching operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracker_core::parse_timestamp;

use crate::error::PluginError;
use crate::plugin::ActivityPlugin;

// =============================================================================
// Catalog
// =============================================================================

/// The plugin's callable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    CreateActivity,
    GetActivities,
    GetActivityById,
    UpdateActivity,
    DeleteActivity,
}

impl FunctionName {
    pub const ALL: [FunctionName; 5] = [
        FunctionName::CreateActivity,
        FunctionName::GetActivities,
        FunctionName::GetActivityById,
        FunctionName::UpdateActivity,
        FunctionName::DeleteActivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::CreateActivity => "CreateActivity",
            FunctionName::GetActivities => "GetActivities",
            FunctionName::GetActivityById => "GetActivityById",
            FunctionName::UpdateActivity => "UpdateActivity",
            FunctionName::DeleteActivity => "DeleteActivity",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FunctionName {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PluginError::UnknownFunction(s.to_string()))
    }
}

/// One parameter of a plugin function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionParameter {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    pub required: bool,
}

impl FunctionParameter {
    fn string(name: &'static str, description: &'static str, required: bool) -> Self {
        Self {
            name,
            description,
            kind: "string",
            format: None,
            required,
        }
    }

    fn date_time(name: &'static str, description: &'static str, required: bool) -> Self {
        Self {
            format: Some("date-time"),
            ..Self::string(name, description, required)
        }
    }
}

/// Description of a plugin function for a function-calling runtime.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<FunctionParameter>,
}

impl FunctionDefinition {
    /// JSON-Schema object describing the parameters.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut property = json!({
                "type": param.kind,
                "description": param.description,
            });
            if let Some(format) = param.format {
                property["format"] = json!(format);
            }
            properties.insert(param.name.to_string(), property);
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn definition(name: FunctionName) -> FunctionDefinition {
    let (description, parameters) = match name {
        FunctionName::CreateActivity => (
            "Creates a new activity with a title, optional description, and scheduled date/time. Returns the created activity details.",
            vec![
                FunctionParameter::string("title", "The title of the activity", true),
                FunctionParameter::string("description", "An optional description of the activity", false),
                FunctionParameter::date_time(
                    "scheduledAt",
                    "The scheduled date and time in ISO 8601 format (e.g., 2026-03-01T10:00:00Z)",
                    true,
                ),
            ],
        ),
        FunctionName::GetActivities => (
            "Retrieves all activities ordered by scheduled time. Optionally filter by status (Pending, InProgress, Completed, Cancelled).",
            vec![FunctionParameter::string(
                "status",
                "Optional status filter: Pending, InProgress, Completed, or Cancelled",
                false,
            )],
        ),
        FunctionName::GetActivityById => (
            "Retrieves a specific activity by its unique ID.",
            vec![FunctionParameter::string(
                "id",
                "The unique identifier (GUID) of the activity",
                true,
            )],
        ),
        FunctionName::UpdateActivity => (
            "Updates an existing activity. Only the supplied fields change: title, description, scheduled time, or status.",
            vec![
                FunctionParameter::string("id", "The unique identifier (GUID) of the activity to update", true),
                FunctionParameter::string("title", "The new title, or null to keep unchanged", false),
                FunctionParameter::string("description", "The new description, or null to keep unchanged", false),
                FunctionParameter::date_time(
                    "scheduledAt",
                    "The new scheduled date/time in ISO 8601 format, or null to keep unchanged",
                    false,
                ),
                FunctionParameter::string(
                    "status",
                    "The new status: Pending, InProgress, Completed, or Cancelled, or null to keep unchanged",
                    false,
                ),
            ],
        ),
        FunctionName::DeleteActivity => (
            "Deletes an activity by its unique ID. This action cannot be undone.",
            vec![FunctionParameter::string(
                "id",
                "The unique identifier (GUID) of the activity to delete",
                true,
            )],
        ),
    };

    FunctionDefinition {
        name: name.as_str(),
        description,
        parameters,
    }
}

// =============================================================================
// Argument decoding
// =============================================================================

/// Borrowed view over a JSON argument object. `null` counts as absent.
struct Arguments<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    fn from_value(value: &'a Value) -> Result<Self, PluginError> {
        match value {
            Value::Object(map) => Ok(Self { map: Some(map) }),
            Value::Null => Ok(Self { map: None }),
            _ => Err(PluginError::ArgumentsNotObject),
        }
    }

    fn optional_str(&self, name: &'static str) -> Result<Option<&'a str>, PluginError> {
        match self.map.and_then(|m| m.get(name)) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(PluginError::InvalidArgumentType {
                name,
                expected: "string",
            }),
        }
    }

    fn required_str(&self, name: &'static str) -> Result<&'a str, PluginError> {
        self.optional_str(name)?
            .ok_or(PluginError::MissingArgument(name))
    }

    fn optional_timestamp(&self, name: &'static str) -> Result<Option<DateTime<Utc>>, PluginError> {
        match self.optional_str(name)? {
            None => Ok(None),
            Some(text) => parse_timestamp(text)
                .map(Some)
                .ok_or_else(|| PluginError::InvalidTimestamp {
                    name,
                    value: text.to_string(),
                }),
        }
    }

    fn required_timestamp(&self, name: &'static str) -> Result<DateTime<Utc>, PluginError> {
        self.optional_timestamp(name)?
            .ok_or(PluginError::MissingArgument(name))
    }
}

// =============================================================================
// Dispatch
// =============================================================================

impl ActivityPlugin {
    /// Catalog of every plugin function.
    pub fn functions() -> Vec<FunctionDefinition> {
        FunctionName::ALL.into_iter().map(definition).collect()
    }

    /// Invoke a function by name with a JSON argument object.
    ///
    /// Always returns a message; unknown functions and malformed arguments
    /// are described in the returned text.
    pub fn invoke(&self, name: &str, arguments: &Value) -> String {
        let result = name
            .parse::<FunctionName>()
            .and_then(|function| self.dispatch(function, arguments));

        match result {
            Ok(message) => {
                tracing::info!(function = %name, "Plugin function invoked");
                message
            }
            Err(e) => {
                tracing::warn!(function = %name, error = %e, "Plugin function rejected arguments");
                e.to_string()
            }
        }
    }

    fn dispatch(&self, function: FunctionName, arguments: &Value) -> Result<String, PluginError> {
        let args = Arguments::from_value(arguments)?;

        let message = match function {
            FunctionName::CreateActivity => {
                let title = args.required_str("title")?;
                let description = args.optional_str("description")?;
                let scheduled_at = args.required_timestamp("scheduledAt")?;
                self.create_activity(title, description, scheduled_at)
            }
            FunctionName::GetActivities => self.get_activities(args.optional_str("status")?),
            FunctionName::GetActivityById => self.get_activity_by_id(args.required_str("id")?),
            FunctionName::UpdateActivity => {
                let id = args.required_str("id")?;
                let title = args.optional_str("title")?;
                let description = args.optional_str("description")?;
                let scheduled_at = args.optional_timestamp("scheduledAt")?;
                let status = args.optional_str("status")?;
                self.update_activity(id, title, description, scheduled_at, status)
            }
            FunctionName::DeleteActivity => self.delete_activity(args.required_str("id")?),
        };

        Ok(message)
    }
}
