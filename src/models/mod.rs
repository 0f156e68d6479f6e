// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod credentials;
pub mod event;

pub use activity::StravaActivity;
pub use credentials::{CredentialState, TokenRefreshResponse};
pub use event::{Calendar, CalendarEvent, EventDraft};
