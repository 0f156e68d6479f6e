// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth credential state and the token refresh payload.

use serde::Deserialize;

/// Persisted OAuth credentials for the single synced athlete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialState {
    /// Current access token (empty when never refreshed)
    pub access_token: String,
    /// When the access token expires (Unix seconds)
    pub expires_at: i64,
    /// Refresh token; Strava rotates it on every refresh
    pub refresh_token: String,
}

impl CredentialState {
    /// Whether the access token can be used at `now` without refreshing.
    pub fn is_valid_at(&self, now: i64, margin_secs: i64) -> bool {
        !self.access_token.is_empty() && now < self.expires_at - margin_secs
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_never_valid() {
        let state = CredentialState {
            access_token: String::new(),
            expires_at: i64::MAX,
            refresh_token: "r".to_string(),
        };
        assert!(!state.is_valid_at(0, 60));
    }

    #[test]
    fn test_validity_margin() {
        let state = CredentialState {
            access_token: "a".to_string(),
            expires_at: 1_000,
            refresh_token: "r".to_string(),
        };
        assert!(state.is_valid_at(939, 60));
        assert!(!state.is_valid_at(940, 60));
        assert!(!state.is_valid_at(2_000, 60));
    }

    #[test]
    fn test_refresh_response_without_expiry() {
        let resp: TokenRefreshResponse =
            serde_json::from_str(r#"{"access_token": "a", "refresh_token": "r"}"#).unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("a"));
        assert_eq!(resp.expires_at, None);
    }
}
