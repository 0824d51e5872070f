//! Durable key/value storage abstraction.
//!
//! Storage is optional infrastructure: every operation is total. Reads that
//! fail look like absent keys and writes that fail are dropped, with the cause
//! logged. No component can fail because persistence is unavailable.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::RwLock;

/// Store keys, each owned by exactly one component.
pub mod keys {
    use crate::analysis::ResultIdentity;

    pub const THEME: &str = "theme";
    pub const SEARCH_HISTORY: &str = "searchHistory";
    pub const SAVED_COMPARISONS: &str = "savedComparisons";
    pub const PREFERRED_PERSONA_ID: &str = "preferredPersonaId";

    /// Per-result feedback key (`feedback_<suffix>`).
    pub fn feedback(identity: &ResultIdentity) -> String {
        format!("feedback_{}", identity.storage_suffix())
    }
}

/// A string key/value store that never fails outward.
pub trait PersistentStore: Send + Sync {
    /// Returns the stored value, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value`; failures are logged and dropped.
    fn set(&self, key: &str, value: &str);

    /// Deletes `key`; failures are logged and dropped.
    fn remove(&self, key: &str);
}

/// JSON helpers available on every [`PersistentStore`].
pub trait PersistentStoreExt {
    /// Parses the value at `key`, returning `fallback` when absent or malformed.
    fn get_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T;

    /// Serializes and stores `value`; serialization failures are dropped.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T);
}

impl<S: PersistentStore + ?Sized> PersistentStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.get(key) else {
            return fallback;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[Store] Ignoring malformed value for '{}': {}", key, e);
                fallback
            }
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, &json),
            Err(e) => tracing::warn!("[Store] Failed to serialize value for '{}': {}", key, e),
        }
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::warn!("[Store] Read of '{}' failed: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
            }
            Err(e) => tracing::warn!("[Store] Write of '{}' dropped: {}", key, e),
        }
    }

    fn remove(&self, key: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(e) => tracing::warn!("[Store] Removal of '{}' dropped: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme"), None);

        store.set("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));

        store.remove("theme");
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_get_json_fallback_on_malformed() {
        let store = MemoryStore::new();
        store.set("searchHistory", "{not json");
        let value: Vec<String> = store.get_json("searchHistory", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_json_round_trip_through_trait_object() {
        let store: Arc<dyn PersistentStore> = Arc::new(MemoryStore::new());
        store.set_json("preferredPersonaId", "gamer");
        let id: Option<String> = store.get_json("preferredPersonaId", None);
        assert_eq!(id.as_deref(), Some("gamer"));
    }

    #[test]
    fn test_feedback_key() {
        use crate::analysis::ResultIdentity;
        let key = keys::feedback(&ResultIdentity::Session("abc".to_string()));
        assert_eq!(key, "feedback_abc");
    }
}
