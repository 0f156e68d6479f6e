// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared fixtures: a fake calendar and Strava mock helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use strava_calendar_sync::db::MemoryStore;
use strava_calendar_sync::error::AppError;
use strava_calendar_sync::models::{Calendar, CalendarEvent, EventDraft};
use strava_calendar_sync::services::{CalendarProvider, StravaClient, SyncEngine, SyncOptions};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Event stored by [`FakeCalendar`].
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub calendar_id: String,
    pub activity_id: Option<u64>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub body: String,
    pub location: String,
}

/// In-memory calendar that records creations and can be told to fail.
#[derive(Default)]
pub struct FakeCalendar {
    calendars: Vec<Calendar>,
    default: Option<Calendar>,
    events: Mutex<Vec<StoredEvent>>,
    fail_activity_ids: Mutex<HashSet<u64>>,
}

impl FakeCalendar {
    /// A calendar named "Strava" plus a default calendar.
    pub fn new() -> Self {
        Self {
            calendars: vec![strava_calendar()],
            default: Some(default_calendar()),
            ..Default::default()
        }
    }

    /// Only a default calendar.
    pub fn default_only() -> Self {
        Self {
            default: Some(default_calendar()),
            ..Default::default()
        }
    }

    /// No calendars at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, activity_id: u64) {
        self.fail_activity_ids.lock().unwrap().insert(activity_id);
    }

    pub fn clear_failures(&self) {
        self.fail_activity_ids.lock().unwrap().clear();
    }

    /// Add an event as if someone (or an earlier run) created it.
    pub fn insert_existing(
        &self,
        calendar: &Calendar,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        body: &str,
    ) {
        self.events.lock().unwrap().push(StoredEvent {
            calendar_id: calendar.id.clone(),
            activity_id: None,
            title: "existing".to_string(),
            start,
            end,
            body: body.to_string(),
            location: String::new(),
        });
    }

    pub fn events(&self) -> Vec<StoredEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Activity IDs of created events, in creation order.
    pub fn created_ids(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.activity_id)
            .collect()
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn find_calendar_by_name(&self, name: &str) -> Result<Option<Calendar>, AppError> {
        Ok(self.calendars.iter().find(|c| c.name == name).cloned())
    }

    async fn default_calendar(&self) -> Result<Option<Calendar>, AppError> {
        Ok(self.default.clone())
    }

    async fn find_events(
        &self,
        calendar: &Calendar,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        text: &str,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.calendar_id == calendar.id)
            .filter(|e| e.start <= end && e.end >= start)
            .filter(|e| e.body.contains(text))
            .map(|e| CalendarEvent {
                id: format!("{}-{}", e.calendar_id, e.start.timestamp()),
                title: e.title.clone(),
                description: e.body.clone(),
            })
            .collect())
    }

    async fn create_event(
        &self,
        calendar: &Calendar,
        draft: &EventDraft,
    ) -> Result<CalendarEvent, AppError> {
        if self
            .fail_activity_ids
            .lock()
            .unwrap()
            .contains(&draft.activity_id)
        {
            return Err(AppError::CalendarAccess("HTTP 500: injected failure".to_string()));
        }

        self.events.lock().unwrap().push(StoredEvent {
            calendar_id: calendar.id.clone(),
            activity_id: Some(draft.activity_id),
            title: draft.title.clone(),
            start: draft.start,
            end: draft.end,
            body: draft.body.clone(),
            location: draft.location.clone(),
        });

        Ok(CalendarEvent {
            id: format!("event-{}", draft.activity_id),
            title: draft.title.clone(),
            description: draft.body.clone(),
        })
    }
}

pub fn strava_calendar() -> Calendar {
    Calendar {
        id: "strava-calendar".to_string(),
        name: "Strava".to_string(),
    }
}

pub fn default_calendar() -> Calendar {
    Calendar {
        id: "primary".to_string(),
        name: "me@example.com".to_string(),
    }
}

/// Start time used for activity `id` in fixtures: one hour per ID.
pub fn start_for(id: u64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::hours(id as i64)
}

/// JSON for a summary activity as returned by the list endpoint.
pub fn activity_json(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Activity {}", id),
        "sport_type": "Run",
        "start_date": start_for(id).to_rfc3339(),
        "elapsed_time": 1800,
        "moving_time": 1700,
        "distance": 5000.0,
        "average_speed": 2.9,
        "total_elevation_gain": 12.0
    })
}

/// A newest-first page containing the given IDs.
pub fn page_json(ids_newest_first: &[u64]) -> serde_json::Value {
    serde_json::Value::Array(ids_newest_first.iter().map(|id| activity_json(*id)).collect())
}

/// Mount a response for one page of `/athlete/activities`.
pub async fn mount_page(server: &MockServer, page: u32, ids_newest_first: &[u64]) {
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(ids_newest_first)))
        .mount(server)
        .await;
}

/// Strava client pointed at a mock server.
pub fn test_strava_client(server: &MockServer) -> StravaClient {
    StravaClient::new("client_id".to_string(), "client_secret".to_string()).with_urls(
        &format!("{}/api/v3", server.uri()),
        &format!("{}/oauth/token", server.uri()),
    )
}

/// Sync options with the given page size and no recovery delay.
pub fn test_options(page_size: u32) -> SyncOptions {
    SyncOptions {
        page_size,
        ..SyncOptions::default()
    }
}

/// Engine wired to a mock Strava server, a fake calendar and a memory store.
pub fn test_engine(
    server: &MockServer,
    calendar: Arc<FakeCalendar>,
    store: Arc<MemoryStore>,
    options: SyncOptions,
) -> SyncEngine {
    SyncEngine::new(test_strava_client(server), calendar, store, options)
}
