// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar provider abstraction and the Google Calendar implementation.

use crate::config::{Config, ConfigError, GOOGLE_CALENDAR_API_URL};
use crate::error::AppError;
use crate::models::{Calendar, CalendarEvent, EventDraft};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Operations the sync engine needs from a calendar.
///
/// Only lookup, search and create are required; events are never updated
/// or deleted.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Find a calendar whose name matches `name` exactly.
    async fn find_calendar_by_name(&self, name: &str) -> Result<Option<Calendar>, AppError>;

    /// The user's default calendar, if there is one.
    async fn default_calendar(&self) -> Result<Option<Calendar>, AppError>;

    /// Events overlapping `[start, end]` whose description contains `text`.
    async fn find_events(
        &self,
        calendar: &Calendar,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        text: &str,
    ) -> Result<Vec<CalendarEvent>, AppError>;

    /// Create a new event.
    async fn create_event(
        &self,
        calendar: &Calendar,
        draft: &EventDraft,
    ) -> Result<CalendarEvent, AppError>;
}

/// Google Calendar v3 REST client.
#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GOOGLE_CALENDAR_API_URL.to_string(),
            access_token,
        }
    }

    /// Create a client from `config`. Fails if no calendar token is set.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let token = config.require_calendar_token()?;
        Ok(Self::new(token.to_string()).with_base_url(&config.google_calendar_api_url))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self, calendar: &Calendar) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&calendar.id)
        )
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CalendarAccess(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::CalendarAccess(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn find_calendar_by_name(&self, name: &str) -> Result<Option<Calendar>, AppError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| AppError::CalendarAccess(e.to_string()))?;
            let list: CalendarListResponse = Self::check_response_json(response).await?;

            if let Some(entry) = list
                .items
                .into_iter()
                .find(|c| c.summary.as_deref() == Some(name))
            {
                return Ok(Some(Calendar {
                    id: entry.id,
                    name: name.to_string(),
                }));
            }

            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(None),
            }
        }
    }

    async fn default_calendar(&self) -> Result<Option<Calendar>, AppError> {
        let url = format!("{}/calendars/primary", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::CalendarAccess(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let entry: CalendarListEntry = Self::check_response_json(response).await?;
        Ok(Some(Calendar {
            name: entry.summary.unwrap_or_else(|| entry.id.clone()),
            id: entry.id,
        }))
    }

    async fn find_events(
        &self,
        calendar: &Calendar,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        text: &str,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        // Google's timeMin/timeMax bounds are exclusive; widen by a second so
        // events exactly on the boundaries, including zero-length ones, match.
        let time_min = format_utc_rfc3339(start - Duration::seconds(1));
        let time_max = format_utc_rfc3339(end + Duration::seconds(1));

        let response = self
            .http
            .get(self.events_url(calendar))
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("q", text),
                ("singleEvents", "true"),
                ("showDeleted", "false"),
            ])
            .send()
            .await
            .map_err(|e| AppError::CalendarAccess(e.to_string()))?;

        let list: EventsListResponse = Self::check_response_json(response).await?;

        // `q` is a fuzzy full-text match; keep only real substring hits.
        Ok(list
            .items
            .into_iter()
            .filter(|e| e.status.as_deref() != Some("cancelled"))
            .map(GoogleEvent::into_calendar_event)
            .filter(|e| e.description.contains(text))
            .collect())
    }

    async fn create_event(
        &self,
        calendar: &Calendar,
        draft: &EventDraft,
    ) -> Result<CalendarEvent, AppError> {
        let body = EventInsertRequest {
            summary: &draft.title,
            description: &draft.body,
            location: &draft.location,
            start: EventTime {
                date_time: format_utc_rfc3339(draft.start),
            },
            end: EventTime {
                date_time: format_utc_rfc3339(draft.end),
            },
        };

        let response = self
            .http
            .post(self.events_url(calendar))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::CalendarAccess(e.to_string()))?;

        let created: GoogleEvent = Self::check_response_json(response).await?;
        Ok(created.into_calendar_event())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarListEntry {
    id: String,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

impl GoogleEvent {
    fn into_calendar_event(self) -> CalendarEvent {
        CalendarEvent {
            id: self.id,
            title: self.summary.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EventInsertRequest<'a> {
    summary: &'a str,
    description: &'a str,
    location: &'a str,
    start: EventTime,
    end: EventTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: String,
}
