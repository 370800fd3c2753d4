//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/query/body input via axum extractors,
//! validates it, calls the store or plugin from `AppState`, and returns a
//! JSON response.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tracker_core::config::ValidationConfig;
use tracker_core::{parse_activity_id, parse_timestamp, Activity, ActivityStatus};
use tracker_plugin::{ActivityPlugin, FunctionName};
use tracker_store::{ActivityQuery, ActivityUpdate};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Query parameters for GET /api/activities.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListParams {
    pub status: Option<String>,
    pub scheduled_after: Option<String>,
    pub scheduled_before: Option<String>,
}

/// Body for POST /api/activities.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: Option<String>,
}

/// Body for PUT /api/activities/{id}. Absent or null fields are unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<String>,
    pub status: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            description: activity.description,
            scheduled_at: activity.scheduled_at,
            status: activity.status,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub activity_count: u64,
}

/// One entry of the plugin function catalog, in tool-definition shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    /// JSON-Schema object for the arguments.
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionCatalogResponse {
    pub functions: Vec<FunctionDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionInvocationResponse {
    pub function: String,
    pub result: String,
}

// =============================================================================
// Validation
// =============================================================================

fn validate_title(title: &str, limits: &ValidationConfig) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("'title' must not be empty".to_string()));
    }
    if title.chars().count() > limits.max_title_length {
        return Err(ApiError::BadRequest(format!(
            "'title' must be at most {} characters",
            limits.max_title_length
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>, limits: &ValidationConfig) -> Result<(), ApiError> {
    match description {
        Some(text) if text.chars().count() > limits.max_description_length => {
            Err(ApiError::BadRequest(format!(
                "'description' must be at most {} characters",
                limits.max_description_length
            )))
        }
        _ => Ok(()),
    }
}

fn parse_time_param(name: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_timestamp(value).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid '{}': '{}'. Use ISO 8601 format, e.g. 2026-03-01T10:00:00Z",
            name, value
        ))
    })
}

fn parse_status_param(value: &str) -> Result<ActivityStatus, ApiError> {
    value.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid 'status': '{}'. Valid values are: {}",
            value,
            ActivityStatus::valid_values()
        ))
    })
}

fn location(id: Uuid) -> String {
    format!("/api/activities/{}", id)
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        activity_count: state.store.len() as u64,
    })
}

/// GET /api/activities - list activities ordered by scheduled time.
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ActivityListParams>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let mut query = ActivityQuery::all();

    if let Some(status) = params.status.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.with_status(parse_status_param(status)?);
    }
    if let Some(after) = params.scheduled_after.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.scheduled_after(parse_time_param("scheduledAfter", after)?);
    }
    if let Some(before) = params.scheduled_before.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.scheduled_before(parse_time_param("scheduledBefore", before)?);
    }

    let activities = state.store.get_all(&query);
    tracing::debug!(count = activities.len(), "Listed activities");

    Ok(Json(activities.into_iter().map(ActivityResponse::from).collect()))
}

/// GET /api/activities/{id}
pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let id = parse_activity_id(&id)?;

    state
        .store
        .get_by_id(id)
        .map(|activity| Json(activity.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Activity {} not found", id)))
}

/// POST /api/activities - create an activity, 201 with a Location header.
pub async fn create_activity(
    State(state): State<AppState>,
    Json(body): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = &state.config.validation;
    validate_title(&body.title, limits)?;
    validate_description(body.description.as_deref(), limits)?;

    let scheduled_at = match body.scheduled_at.as_deref() {
        Some(text) => parse_time_param("scheduledAt", text)?,
        None => return Err(ApiError::BadRequest("'scheduledAt' is required".to_string())),
    };

    let activity = state
        .store
        .create(body.title, body.description, scheduled_at);
    tracing::info!(id = %activity.id, "Activity created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(activity.id))],
        Json(ActivityResponse::from(activity)),
    ))
}

/// PUT /api/activities/{id} - partial update.
pub async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let id = parse_activity_id(&id)?;

    let limits = &state.config.validation;
    if let Some(title) = body.title.as_deref() {
        validate_title(title, limits)?;
    }
    validate_description(body.description.as_deref(), limits)?;

    let scheduled_at = body
        .scheduled_at
        .as_deref()
        .map(|text| parse_time_param("scheduledAt", text))
        .transpose()?;
    let status = body
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_status_param)
        .transpose()?;

    let update = ActivityUpdate {
        title: body.title,
        description: body.description,
        scheduled_at,
        status,
    };

    let activity = state
        .store
        .update(id, update)
        .ok_or_else(|| ApiError::NotFound(format!("Activity {} not found", id)))?;
    tracing::info!(id = %id, status = %activity.status, "Activity updated");

    Ok(Json(activity.into()))
}

/// DELETE /api/activities/{id} - 204 on success.
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_activity_id(&id)?;

    if state.store.delete(id) {
        tracing::info!(id = %id, "Activity deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Activity {} not found", id)))
    }
}

/// GET /api/plugin/functions - the function-calling catalog.
pub async fn list_functions() -> Json<FunctionCatalogResponse> {
    let functions = ActivityPlugin::functions()
        .into_iter()
        .map(|def| FunctionDescriptor {
            name: def.name.to_string(),
            description: def.description.to_string(),
            parameters: def.json_schema(),
        })
        .collect();

    Json(FunctionCatalogResponse { functions })
}

/// POST /api/plugin/functions/{name} - invoke a plugin function.
///
/// The body is the JSON arguments object; an empty body means no arguments.
/// Argument problems are reported in `result`, not as HTTP errors.
pub async fn invoke_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<FunctionInvocationResponse>, ApiError> {
    let function: FunctionName = name
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown function '{}'", name)))?;

    let arguments: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON arguments: {}", e)))?
    };

    let result = state.plugin.invoke(function.as_str(), &arguments);

    Ok(Json(FunctionInvocationResponse {
        function: function.to_string(),
        result,
    }))
}
