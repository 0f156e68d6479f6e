// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key-value state (OAuth tokens and the sync cursor).

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{AppError, Result};
use crate::models::CredentialState;

/// Key names as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const EXPIRES_AT: &str = "expires_at";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Highest Strava activity ID mirrored to the calendar
    pub const CURSOR: &str = "cursor";
}

/// String key-value store shared by the token manager and the sync engine.
///
/// Passes are serialized by the scheduler, so implementations need no
/// locking beyond making `set_many` atomic.
pub trait StateStore: Send + Sync {
    /// Read a single value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several values at once. Either all are persisted or none are.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Load the stored credentials. Missing fields come back empty/zero.
    fn load_credentials(&self) -> Result<CredentialState> {
        let expires_at = match self.get(keys::EXPIRES_AT)? {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Store(format!("Invalid {} value: {}", keys::EXPIRES_AT, raw))
            })?,
            None => 0,
        };

        Ok(CredentialState {
            access_token: self.get(keys::ACCESS_TOKEN)?.unwrap_or_default(),
            expires_at,
            refresh_token: self.get(keys::REFRESH_TOKEN)?.unwrap_or_default(),
        })
    }

    /// Persist all three credential fields in one write.
    fn save_credentials(&self, credentials: &CredentialState) -> Result<()> {
        self.set_many(&[
            (keys::ACCESS_TOKEN, credentials.access_token.clone()),
            (keys::EXPIRES_AT, credentials.expires_at.to_string()),
            (keys::REFRESH_TOKEN, credentials.refresh_token.clone()),
        ])
    }

    /// Read the sync cursor. Defaults to 0 ("sync everything").
    fn cursor(&self) -> Result<u64> {
        match self.get(keys::CURSOR)? {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Store(format!("Invalid {} value: {}", keys::CURSOR, raw))),
            None => Ok(0),
        }
    }

    fn set_cursor(&self, cursor: u64) -> Result<()> {
        self.set_many(&[(keys::CURSOR, cursor.to_string())])
    }
}
