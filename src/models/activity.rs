// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as returned by the list and detail endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Activity record from Strava.
///
/// Summary (list) and detailed responses share this shape; everything but
/// the ID is optional so partial payloads still deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StravaActivity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    #[serde(default)]
    pub name: Option<String>,
    /// Sport type (Ride, Run, Hike, etc.)
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Legacy activity type, used when `sport_type` is absent
    #[serde(default, rename = "type")]
    pub activity_type: Option<String>,
    /// Start date/time (ISO 8601, UTC)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: Option<u64>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Average speed in meters per second
    #[serde(default)]
    pub average_speed: Option<f64>,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    /// Free-text description (detail endpoint only)
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,
}

impl StravaActivity {
    /// Sport type, falling back to the legacy `type` field.
    pub fn kind(&self) -> Option<&str> {
        non_empty(self.sport_type.as_deref()).or(non_empty(self.activity_type.as_deref()))
    }

    /// Parse the start timestamp. `None` if missing or malformed.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        let raw = self.start_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_summary_payload() {
        let json = r#"{
            "id": 16804567307,
            "name": "Morning Run",
            "type": "Run",
            "sport_type": "TrailRun",
            "start_date": "2026-01-10T16:05:00Z",
            "elapsed_time": 3723,
            "moving_time": 3500,
            "distance": 12345.0,
            "average_speed": 3.5,
            "total_elevation_gain": 210.4,
            "location_city": null,
            "location_country": "United States"
        }"#;

        let activity: StravaActivity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.id, 16804567307);
        assert_eq!(activity.kind(), Some("TrailRun"));
        assert_eq!(activity.elapsed_time, Some(3723));
        assert_eq!(activity.location_city, None);
        assert_eq!(
            activity.start().unwrap().to_rfc3339(),
            "2026-01-10T16:05:00+00:00"
        );
    }

    #[test]
    fn test_minimal_payload() {
        let activity: StravaActivity = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(activity.id, 7);
        assert_eq!(activity.kind(), None);
        assert!(activity.start().is_none());
    }

    #[test]
    fn test_kind_falls_back_to_legacy_type() {
        let activity = StravaActivity {
            id: 1,
            sport_type: Some("  ".to_string()),
            activity_type: Some("Ride".to_string()),
            ..Default::default()
        };
        assert_eq!(activity.kind(), Some("Ride"));
    }

    #[test]
    fn test_malformed_start_date() {
        let activity = StravaActivity {
            id: 1,
            start_date: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(activity.start().is_none());
    }
}
