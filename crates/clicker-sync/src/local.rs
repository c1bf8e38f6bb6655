//! Client-local mirror
//!
//! A small blob the client keeps next to the server state: research points
//! earned offline and the last time the client was seen. It never travels
//! to the server.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key the mirror is stored under
pub const STORAGE_KEY: &str = "clicker.local";

/// String key/value store (browser local storage, a file, ...)
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMirror {
    pub research_points: u64,
    /// Wall-clock milliseconds of the last save
    pub last_seen_ms: u64,
}

impl LocalMirror {
    /// Load the mirror, or a fresh one when nothing is stored yet
    ///
    /// A corrupt blob is an error rather than a silent reset.
    pub fn load(storage: &impl Storage) -> Result<Self> {
        match storage.get(STORAGE_KEY) {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, storage: &mut impl Storage) -> Result<()> {
        storage.set(STORAGE_KEY, serde_json::to_string(self)?);
        Ok(())
    }

    /// Whole seconds since the last save; zero for a fresh mirror
    pub fn offline_secs(&self, now_ms: u64) -> u64 {
        if self.last_seen_ms == 0 {
            return 0;
        }
        now_ms.saturating_sub(self.last_seen_ms) / 1000
    }

    pub fn touch(&mut self, now_ms: u64) {
        self.last_seen_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::default();
        assert_eq!(LocalMirror::load(&storage).unwrap(), LocalMirror::default());

        let mut mirror = LocalMirror {
            research_points: 12,
            ..Default::default()
        };
        mirror.touch(5_000);
        mirror.save(&mut storage).unwrap();

        let text = storage.get(STORAGE_KEY).unwrap();
        assert_eq!(text, r#"{"researchPoints":12,"lastSeenMs":5000}"#);
        assert_eq!(LocalMirror::load(&storage).unwrap(), mirror);
    }

    #[test]
    fn test_offline_secs() {
        let mut mirror = LocalMirror::default();
        assert_eq!(mirror.offline_secs(90_000), 0);
        mirror.touch(10_000);
        assert_eq!(mirror.offline_secs(72_500), 62);
        assert_eq!(mirror.offline_secs(1_000), 0);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let mut storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, "{not json".into());
        assert!(LocalMirror::load(&storage).is_err());
    }
}
