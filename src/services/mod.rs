// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod calendar;
pub mod strava;
pub mod sync;
pub mod token;

pub use calendar::{CalendarProvider, GoogleCalendarClient};
pub use strava::StravaClient;
pub use sync::{SyncEngine, SyncOptions, SyncOutcome};
pub use token::TokenManager;
