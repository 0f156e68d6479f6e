// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle for the synced athlete.

use crate::db::StateStore;
use crate::error::{AppError, Result};
use crate::models::CredentialState;
use crate::services::StravaClient;
use chrono::Utc;
use std::sync::Arc;

/// Margin before token expiration when we proactively refresh.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Token lifetime assumed when Strava omits `expires_at` (6 hours).
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 6 * 60 * 60;

/// Keeps a valid Strava access token in the state store.
///
/// The stored access token is reused until it is within
/// [`TOKEN_REFRESH_MARGIN_SECS`] of expiry; only then is the refresh token
/// exchanged. Strava rotates refresh tokens, so the new one always replaces
/// the old one in the same write as the new access token.
pub struct TokenManager {
    client: StravaClient,
    store: Arc<dyn StateStore>,
    /// Refresh token from configuration, used until a rotated one is stored
    initial_refresh_token: String,
}

impl TokenManager {
    pub fn new(
        client: StravaClient,
        store: Arc<dyn StateStore>,
        initial_refresh_token: String,
    ) -> Self {
        Self {
            client,
            store,
            initial_refresh_token,
        }
    }

    /// Get a valid (non-expiring) access token, refreshing if needed.
    pub async fn ensure_valid_access_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let current = self.store.load_credentials()?;

        if current.is_valid_at(now, TOKEN_REFRESH_MARGIN_SECS) {
            tracing::debug!(expires_at = current.expires_at, "Reusing stored access token");
            return Ok(current.access_token);
        }

        let refresh_token = if current.refresh_token.is_empty() {
            self.initial_refresh_token.clone()
        } else {
            current.refresh_token
        };

        tracing::info!("Access token missing or expiring, refreshing");
        let response = self.client.refresh_token(&refresh_token).await?;

        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Token response missing access_token".to_string())
            })?;

        let updated = CredentialState {
            access_token,
            expires_at: response
                .expires_at
                .unwrap_or(now + DEFAULT_TOKEN_LIFETIME_SECS),
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or(refresh_token),
        };

        self.store.save_credentials(&updated)?;

        tracing::info!(expires_at = updated.expires_at, "Token refreshed and stored");
        Ok(updated.access_token)
    }
}
