// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync engine: mirrors Strava activities onto the calendar.
//!
//! Two passes share calendar resolution, mapping and de-duplication:
//! 1. Incremental: page through activities newer than the stored cursor
//!    and advance the cursor afterwards
//! 2. Recovery: fetch activities after a timestamp without touching the
//!    cursor (safe to repeat, duplicates are detected via the marker)

use crate::config::{
    Config, DEFAULT_CALENDAR_NAME, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, RECOVERY_PAGE_SIZE,
};
use crate::db::StateStore;
use crate::error::{AppError, Result};
use crate::models::{Calendar, StravaActivity};
use crate::services::activity::{build_event, has_marker, marker};
use crate::services::{CalendarProvider, StravaClient};
use std::sync::Arc;
use std::time::Duration;

/// Tunables for a sync pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Calendar preferred over the default calendar
    pub calendar_name: String,
    pub page_size: u32,
    /// Hard stop for incremental paging
    pub max_pages: u32,
    pub recovery_page_size: u32,
    /// Pause after each event created during recovery
    pub recovery_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            recovery_page_size: RECOVERY_PAGE_SIZE,
            recovery_delay: Duration::ZERO,
        }
    }
}

impl SyncOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            calendar_name: config.calendar_name.clone(),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
            recovery_page_size: RECOVERY_PAGE_SIZE,
            recovery_delay: config.recovery_delay,
        }
    }
}

/// What happened to a single activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    /// An event with this activity's marker was already on the calendar
    AlreadyPresent,
}

/// Mirrors Strava activities to a calendar.
pub struct SyncEngine {
    strava: StravaClient,
    calendar: Arc<dyn CalendarProvider>,
    store: Arc<dyn StateStore>,
    options: SyncOptions,
}

impl SyncEngine {
    pub fn new(
        strava: StravaClient,
        calendar: Arc<dyn CalendarProvider>,
        store: Arc<dyn StateStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            strava,
            calendar,
            store,
            options,
        }
    }

    /// Run one incremental pass. Returns the number of events created.
    ///
    /// The cursor advances to the highest activity ID processed (created or
    /// found already present), even if a lower ID in the same pass failed.
    /// Such a failed activity is not retried by later incremental passes;
    /// a recovery pass or a cursor reset picks it up.
    ///
    /// Pages arrive newest first, so stopping at `max_pages` leaves the
    /// older activities on the remaining pages unfetched while the cursor
    /// still moves past them. Later incremental passes never see them; they
    /// have to be filled with a recovery pass starting before the oldest
    /// activity this pass fetched.
    pub async fn sync_new_activities(&self, access_token: &str) -> Result<usize> {
        let calendar = self.resolve_calendar().await?;
        let cursor = self.store.cursor()?;

        tracing::info!(cursor, calendar = %calendar.name, "Starting incremental sync");

        let mut max_processed = cursor;
        let mut oldest_fetched: Option<String> = None;
        let mut created = 0usize;
        let mut page = 1u32;

        loop {
            if page > self.options.max_pages {
                tracing::warn!(
                    max_pages = self.options.max_pages,
                    oldest_fetched = oldest_fetched.as_deref().unwrap_or("unknown"),
                    "Page limit reached; older activities were not fetched and will not be \
                     synced by later passes. Run `recover --since <time>` to fill them"
                );
                break;
            }

            let activities = match self
                .strava
                .list_activities(access_token, page, self.options.page_size)
                .await
            {
                Ok(a) => a,
                Err(e) => {
                    tracing::error!(page, error = %e, "Failed to list activities");
                    // Keep progress from earlier pages before bailing out.
                    self.advance_cursor(cursor, max_processed)?;
                    return Err(e);
                }
            };

            let fetched = activities.len();
            tracing::debug!(page, fetched, "Fetched activity page");

            if let Some(start) = activities.last().and_then(|a| a.start_date.clone()) {
                oldest_fetched = Some(start);
            }

            // Pages arrive newest first; create the older events first.
            for activity in activities.into_iter().rev() {
                if activity.id <= cursor {
                    continue;
                }

                match self.sync_activity(&calendar, &activity).await {
                    Ok(outcome) => {
                        if outcome == SyncOutcome::Created {
                            created += 1;
                        }
                        max_processed = max_processed.max(activity.id);
                    }
                    Err(e) => {
                        tracing::warn!(activity_id = activity.id, error = %e, "Skipping activity");
                    }
                }
            }

            if fetched < self.options.page_size as usize {
                break;
            }
            page += 1;
        }

        self.advance_cursor(cursor, max_processed)?;

        tracing::info!(created, cursor = max_processed, "Incremental sync complete");
        Ok(created)
    }

    /// Re-sync every activity started after `since` (Unix seconds).
    ///
    /// Never reads or writes the cursor.
    pub async fn recover_window(&self, access_token: &str, since: i64) -> Result<usize> {
        let calendar = self.resolve_calendar().await?;

        let mut activities = self
            .strava
            .list_activities_after(access_token, since, self.options.recovery_page_size)
            .await?;
        activities.sort_by_key(|a| a.id);

        tracing::info!(
            since,
            fetched = activities.len(),
            calendar = %calendar.name,
            "Starting recovery sync"
        );

        let mut created = 0usize;
        for activity in &activities {
            match self.sync_activity(&calendar, activity).await {
                Ok(SyncOutcome::Created) => {
                    created += 1;
                    if !self.options.recovery_delay.is_zero() {
                        tokio::time::sleep(self.options.recovery_delay).await;
                    }
                }
                Ok(SyncOutcome::AlreadyPresent) => {}
                Err(e) => {
                    tracing::warn!(activity_id = activity.id, error = %e, "Skipping activity");
                }
            }
        }

        tracing::info!(created, "Recovery sync complete");
        Ok(created)
    }

    /// Pick the named calendar, falling back to the default one.
    pub async fn resolve_calendar(&self) -> Result<Calendar> {
        let name = &self.options.calendar_name;

        if let Some(calendar) = self
            .calendar
            .find_calendar_by_name(name)
            .await
            .map_err(into_calendar_access)?
        {
            return Ok(calendar);
        }

        tracing::info!(name = %name, "Named calendar not found, using default calendar");

        self.calendar
            .default_calendar()
            .await
            .map_err(into_calendar_access)?
            .ok_or_else(|| AppError::CalendarAccess("No usable calendar found".to_string()))
    }

    /// Create the event for one activity unless it already exists.
    pub async fn sync_activity(
        &self,
        calendar: &Calendar,
        activity: &StravaActivity,
    ) -> Result<SyncOutcome> {
        let creation_error = |message: String| AppError::EventCreation {
            activity_id: activity.id,
            message,
        };

        let draft = build_event(activity).map_err(|e| creation_error(e.to_string()))?;

        let existing = self
            .calendar
            .find_events(calendar, draft.start, draft.end, &marker(activity.id))
            .await
            .map_err(|e| creation_error(e.to_string()))?;

        if existing.iter().any(|e| has_marker(&e.description, activity.id)) {
            tracing::debug!(activity_id = activity.id, "Event already exists, skipping");
            return Ok(SyncOutcome::AlreadyPresent);
        }

        self.calendar
            .create_event(calendar, &draft)
            .await
            .map_err(|e| creation_error(e.to_string()))?;

        tracing::info!(activity_id = activity.id, title = %draft.title, "Event created");
        Ok(SyncOutcome::Created)
    }

    fn advance_cursor(&self, previous: u64, max_processed: u64) -> Result<()> {
        if max_processed > previous {
            self.store.set_cursor(max_processed)?;
            tracing::debug!(previous, cursor = max_processed, "Cursor advanced");
        }
        Ok(())
    }
}

fn into_calendar_access(err: AppError) -> AppError {
    match err {
        AppError::CalendarAccess(_) => err,
        other => AppError::CalendarAccess(other.to_string()),
    }
}
