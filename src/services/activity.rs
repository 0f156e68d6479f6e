// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapping from Strava activities to calendar events.
//!
//! The output is deterministic: the same activity always yields the same
//! title, time range, body and location. The first body line carries the
//! marker used to recognise events this tool already created.

use crate::models::activity::non_empty;
use crate::models::{EventDraft, StravaActivity};
use chrono::TimeDelta;

/// Label of the marker line embedded in every event body.
pub const ID_LABEL: &str = "Strava ID";

/// Title used when an activity has neither a name nor a type.
const FALLBACK_TITLE: &str = "Activity";

/// Marker text identifying the event for `activity_id`.
pub fn marker(activity_id: u64) -> String {
    format!("{}: {}", ID_LABEL, activity_id)
}

/// Whether an event body carries the marker for `activity_id`.
///
/// The marker may sit anywhere in the body, but must not be followed by
/// another digit: the marker for 42 does not match an event for 421.
pub fn has_marker(body: &str, activity_id: u64) -> bool {
    let marker = marker(activity_id);
    body.match_indices(&marker).any(|(pos, _)| {
        !body[pos + marker.len()..].starts_with(|c: char| c.is_ascii_digit())
    })
}

/// Build the calendar event for an activity.
pub fn build_event(activity: &StravaActivity) -> Result<EventDraft, MappingError> {
    let start = activity.start().ok_or_else(|| {
        MappingError::InvalidStartDate(activity.start_date.clone().unwrap_or_default())
    })?;

    let elapsed = activity.elapsed_time.unwrap_or(0);
    let end = i64::try_from(elapsed)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or(MappingError::InvalidDuration(elapsed))?;

    Ok(EventDraft {
        activity_id: activity.id,
        title: build_title(activity),
        start,
        end,
        body: build_body(activity),
        location: build_location(activity),
    })
}

fn build_title(activity: &StravaActivity) -> String {
    non_empty(activity.name.as_deref())
        .or_else(|| activity.kind())
        .unwrap_or(FALLBACK_TITLE)
        .to_string()
}

fn build_body(activity: &StravaActivity) -> String {
    let mut lines = vec![
        marker(activity.id),
        format!("Type: {}", activity.kind().unwrap_or(FALLBACK_TITLE)),
        format!("Distance: {}", format_distance(activity.distance.unwrap_or(0.0))),
        format!("Elapsed: {}", format_duration(activity.elapsed_time.unwrap_or(0))),
        format!("Moving: {}", format_duration(activity.moving_time.unwrap_or(0))),
    ];

    if let Some(speed) = activity.average_speed.filter(|s| *s != 0.0) {
        lines.push(format!("Avg speed: {}", format_speed(speed)));
    }

    if let Some(gain) = activity.total_elevation_gain.filter(|g| *g != 0.0) {
        lines.push(format!("Elevation gain: {} m", gain.round() as i64));
    }

    if let Some(description) = non_empty(activity.description.as_deref()) {
        lines.push(String::new());
        lines.push(description.to_string());
    }

    lines.join("\n")
}

fn build_location(activity: &StravaActivity) -> String {
    non_empty(activity.location_city.as_deref())
        .or(non_empty(activity.location_country.as_deref()))
        .unwrap_or("")
        .to_string()
}

/// Format a distance in meters: kilometers with two decimals from 1 km up,
/// whole meters below that.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

/// Format a duration in seconds as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Format a speed in meters per second as km/h with one decimal.
pub fn format_speed(meters_per_sec: f64) -> String {
    format!("{:.1} km/h", meters_per_sec * 3.6)
}

/// Errors turning an activity into an event.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Invalid or missing start date: {0:?}")]
    InvalidStartDate(String),

    #[error("Elapsed time out of range: {0}")]
    InvalidDuration(u64),
}
