// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the token manager and sync engine.

use crate::config::ConfigError;

/// Errors raised during a sync pass.
///
/// Everything except [`AppError::EventCreation`] aborts the pass.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Strava token refresh failed: {0}")]
    Authentication(String),

    #[error("Calendar access error: {0}")]
    CalendarAccess(String),

    #[error("Strava activity fetch failed: {0}")]
    ActivityFetch(String),

    #[error("Failed to create event for activity {activity_id}: {message}")]
    EventCreation { activity_id: u64, message: String },

    #[error("State store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used for Strava rate limit errors (HTTP 429).
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Message used when Strava rejects the bearer token (HTTP 401).
    pub const STRAVA_TOKEN_ERROR: &'static str = "Invalid or expired token";

    /// Whether this error should abort the whole pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::EventCreation { .. })
    }

    /// Whether this error was caused by hitting the Strava rate limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::ActivityFetch(msg) if msg == Self::STRAVA_RATE_LIMIT)
    }

    /// Whether Strava rejected the access token.
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::ActivityFetch(msg) if msg == Self::STRAVA_TOKEN_ERROR)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
