//! Human-readable messages returned by the plugin functions.

use tracker_core::{format_timestamp, Activity, ActivityStatus};

pub const INVALID_ID: &str = "Invalid activity ID format. Please provide a valid GUID.";
pub const NO_ACTIVITIES: &str = "No activities found.";

pub fn not_found(id_text: &str) -> String {
    format!("No activity found with ID: {}", id_text)
}

pub fn invalid_status(status_text: &str) -> String {
    format!(
        "Invalid status: '{}'. Valid values are: {}.",
        status_text,
        ActivityStatus::valid_values()
    )
}

pub fn created(activity: &Activity) -> String {
    format!("Activity created successfully!\n{}", summary(activity))
}

pub fn updated(activity: &Activity) -> String {
    format!("Activity updated successfully!\n{}", summary(activity))
}

pub fn deleted(id_text: &str) -> String {
    format!("Activity with ID {} has been deleted successfully.", id_text)
}

/// Full record, including creation and last-update times.
pub fn details(activity: &Activity) -> String {
    let updated = activity
        .updated_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "Never".to_string());

    format!(
        "Activity details:\n{}\n  Created: {}\n  Updated: {}",
        summary(activity),
        format_timestamp(&activity.created_at),
        updated
    )
}

/// Count header followed by one block per activity, in the given order.
pub fn listing(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return NO_ACTIVITIES.to_string();
    }

    let mut out = format!("Found {} activity(ies):\n", activities.len());
    for activity in activities {
        out.push_str(&format!(
            "\n  - [{}] {} (ID: {})\n    Scheduled: {}\n    Description: {}\n",
            activity.status,
            activity.title,
            activity.id,
            format_timestamp(&activity.scheduled_at),
            description(activity)
        ));
    }
    out
}

fn summary(activity: &Activity) -> String {
    format!(
        "  ID: {}\n  Title: {}\n  Description: {}\n  Scheduled: {}\n  Status: {}",
        activity.id,
        activity.title,
        description(activity),
        format_timestamp(&activity.scheduled_at),
        activity.status
    )
}

fn description(activity: &Activity) -> &str {
    activity.description.as_deref().unwrap_or("None")
}
