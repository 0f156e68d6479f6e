// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file state store.
//!
//! The whole state is a flat JSON object of strings. Writes go to a sibling
//! temp file which is then renamed over the original, so a crash mid-write
//! never leaves a truncated state file behind.

use crate::db::StateStore;
use crate::error::{AppError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// [`StateStore`] backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(AppError::Store(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if data.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&data).map_err(|e| {
            AppError::Store(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, values: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| AppError::Store(format!("Failed to serialize state: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)
            .map_err(|e| AppError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::Store(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.read_all()?;
        Ok(match values.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut values = self.read_all()?;
        for (key, value) in entries {
            values.insert((*key).to_string(), Value::String(value.clone()));
        }
        self.write_all(&values)?;
        tracing::debug!(path = %self.path.display(), keys = entries.len(), "State saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::keys;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));

        assert_eq!(store.get(keys::CURSOR).unwrap(), None);
        assert_eq!(store.cursor().unwrap(), 0);
    }

    #[test]
    fn test_set_many_merges_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::new(&path);

        store.set_cursor(10).unwrap();
        store
            .set_many(&[
                (keys::ACCESS_TOKEN, "a".to_string()),
                (keys::REFRESH_TOKEN, "r".to_string()),
            ])
            .unwrap();

        // A fresh handle sees everything written so far.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.cursor().unwrap(), 10);
        assert_eq!(reopened.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("a"));
        assert_eq!(reopened.get(keys::REFRESH_TOKEN).unwrap().as_deref(), Some("r"));
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_numeric_values_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"cursor": 99, "expires_at": 1700000000}"#).unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.cursor().unwrap(), 99);
        assert_eq!(store.load_credentials().unwrap().expires_at, 1_700_000_000);
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get(keys::CURSOR), Err(AppError::Store(_))));
    }
}
