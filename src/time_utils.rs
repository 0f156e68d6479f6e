// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format Unix seconds as RFC3339, or `None` if out of range.
pub fn format_unix_rfc3339(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(format_utc_rfc3339)
}

/// Parse either Unix seconds or an RFC3339 timestamp into Unix seconds.
pub fn parse_timestamp(input: &str) -> Option<i64> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<i64>() {
        return Some(secs);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.timestamp())
}
