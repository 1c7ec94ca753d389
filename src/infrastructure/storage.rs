//! File-backed key/value persistence
//!
//! Three independent keys are stored in one JSON object: the theme
//! preference, the refresh interval (milliseconds), and the history
//! collection. Each key is read once at startup; the file is rewritten
//! after every mutation. Malformed content is treated as absent.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::shared::errors::StorageError;

pub const KEY_THEME: &str = "theme";
pub const KEY_REFRESH_INTERVAL: &str = "refresh_interval";
pub const KEY_HISTORY: &str = "history";

pub struct KvStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl KvStore {
    /// Open the store at `path`, seeding from the file if it exists and
    /// parses. A missing file is a first run; a malformed file is discarded
    /// with a warning - neither is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!("State file {} is not a JSON object, starting empty", path.display());
                    Map::new()
                }
                Err(e) => {
                    warn!("State file {} is malformed ({}), starting empty", path.display(), e);
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self { path, entries }
    }

    /// Typed read. A missing or malformed value yields `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Discarding malformed value for key '{}': {}", key, e);
                None
            }
        }
    }

    /// Typed write. The whole store is flushed to disk after every
    /// mutation; a write failure is logged, never fatal.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.entries.insert(key.to_string(), encoded);
            }
            Err(e) => {
                warn!("Failed to encode value for key '{}': {}", key, e);
                return;
            }
        }
        if let Err(e) = self.flush() {
            warn!("Failed to persist state to {}: {}", self.path.display(), e);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let raw = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::Theme;

    #[test]
    fn test_set_then_reopen_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = KvStore::open(&path);
        store.set(KEY_THEME, &Theme::Dark);
        store.set(KEY_REFRESH_INTERVAL, &30_000u64);

        let reopened = KvStore::open(&path);
        assert_eq!(reopened.get::<Theme>(KEY_THEME), Some(Theme::Dark));
        assert_eq!(reopened.get::<u64>(KEY_REFRESH_INTERVAL), Some(30_000));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("nope.json"));
        assert_eq!(store.get::<Theme>(KEY_THEME), None);
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = KvStore::open(&path);
        assert_eq!(store.get::<u64>(KEY_REFRESH_INTERVAL), None);
    }

    #[test]
    fn test_malformed_value_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"refresh_interval": "soon"}"#).unwrap();

        let store = KvStore::open(&path);
        assert_eq!(store.get::<u64>(KEY_REFRESH_INTERVAL), None);
    }
}
