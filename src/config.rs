// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local runs.

use crate::time_utils::parse_timestamp;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Strava REST API base URL.
pub const STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth token endpoint.
pub const STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth/token";
/// Default Google Calendar REST API base URL.
pub const GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
/// Name of the calendar events are written to, when it exists.
pub const DEFAULT_CALENDAR_NAME: &str = "Strava";

/// Activities requested per page during an incremental pass.
pub const DEFAULT_PAGE_SIZE: u32 = 30;
/// Upper bound on pages fetched in one incremental pass.
pub const DEFAULT_MAX_PAGES: u32 = 100;
/// Activities requested by a recovery pass (single page).
pub const RECOVERY_PAGE_SIZE: u32 = 100;
/// Pause between event creations during a recovery pass.
pub const DEFAULT_RECOVERY_DELAY_MS: u64 = 500;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Secrets ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Initial Strava refresh token (superseded by rotated tokens in the state store)
    pub strava_refresh_token: String,
    /// Bearer token for the Google Calendar API
    pub google_calendar_token: Option<String>,

    // --- Endpoints ---
    pub strava_api_url: String,
    pub strava_oauth_url: String,
    pub google_calendar_api_url: String,

    // --- Sync behavior ---
    /// Calendar to prefer over the default calendar
    pub calendar_name: String,
    /// Path of the JSON state file (tokens and cursor)
    pub state_path: PathBuf,
    pub page_size: u32,
    pub max_pages: u32,
    pub recovery_delay: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            google_calendar_token: Some("test_calendar_token".to_string()),
            strava_api_url: STRAVA_API_URL.to_string(),
            strava_oauth_url: STRAVA_OAUTH_URL.to_string(),
            google_calendar_api_url: GOOGLE_CALENDAR_API_URL.to_string(),
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            state_path: PathBuf::from("sync_state.json"),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            recovery_delay: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails if any of the three Strava secrets is missing or blank, so no
    /// network call is made with an incomplete configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: required_secret("STRAVA_CLIENT_ID")?,
            strava_client_secret: required_secret("STRAVA_CLIENT_SECRET")?,
            strava_refresh_token: required_secret("STRAVA_REFRESH_TOKEN")?,
            google_calendar_token: env::var("GOOGLE_CALENDAR_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| STRAVA_OAUTH_URL.to_string()),
            google_calendar_api_url: env::var("GOOGLE_CALENDAR_API_URL")
                .unwrap_or_else(|_| GOOGLE_CALENDAR_API_URL.to_string()),

            calendar_name: env::var("CALENDAR_NAME")
                .unwrap_or_else(|_| DEFAULT_CALENDAR_NAME.to_string()),
            state_path: env::var("SYNC_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("sync_state.json")),
            page_size: parse_or("SYNC_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            max_pages: parse_or("SYNC_MAX_PAGES", DEFAULT_MAX_PAGES),
            recovery_delay: Duration::from_millis(parse_or(
                "RECOVERY_CREATE_DELAY_MS",
                DEFAULT_RECOVERY_DELAY_MS,
            )),
        })
    }

    /// The calendar API token, required by commands that touch the calendar.
    pub fn require_calendar_token(&self) -> Result<&str, ConfigError> {
        self.google_calendar_token
            .as_deref()
            .ok_or(ConfigError::Missing("GOOGLE_CALENDAR_TOKEN"))
    }
}

/// Parse the `--since` argument of a recovery pass (Unix seconds or RFC3339).
pub fn parse_since(raw: &str) -> Result<i64, ConfigError> {
    parse_timestamp(raw).ok_or_else(|| ConfigError::Invalid {
        name: "--since",
        value: raw.to_string(),
    })
}

fn required_secret(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value.to_string())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
