// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Calendar-side models.

use chrono::{DateTime, Utc};

/// A calendar events can be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: String,
    pub name: String,
}

/// An existing event, as returned by a calendar search.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A new event derived from one Strava activity.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Source activity, rendered into `body` as the de-duplication marker
    pub activity_id: u64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub body: String,
    pub location: String,
}
