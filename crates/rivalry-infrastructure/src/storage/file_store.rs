//! File-backed implementation of the persistent store.

use rivalry_core::store::PersistentStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use super::atomic_json::AtomicJsonFile;

type Entries = BTreeMap<String, String>;

/// Persistent store that keeps every key in a single JSON object on disk.
///
/// Values are cached in memory. Each write is a locked read-modify-write of
/// the file, so concurrent processes never clobber each other's keys. When the
/// file cannot be written the in-memory value still changes, and the store
/// keeps working for the rest of the process.
pub struct FileStore {
    file: AtomicJsonFile<Entries>,
    cache: RwLock<Entries>,
}

impl FileStore {
    /// Opens the store at `path`. Missing or unreadable files start empty.
    pub fn open(path: PathBuf) -> Self {
        let file = AtomicJsonFile::new(path);
        let entries = match file.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("[FileStore] Starting empty, could not read {:?}: {}", file.path(), e);
                Entries::new()
            }
        };
        tracing::debug!("[FileStore] Opened {:?} with {} keys", file.path(), entries.len());

        Self {
            file,
            cache: RwLock::new(entries),
        }
    }

    fn write_through<F>(&self, key: &str, apply: F)
    where
        F: Fn(&mut Entries),
    {
        match self.cache.write() {
            Ok(mut cache) => apply(&mut cache),
            Err(e) => {
                tracing::warn!("[FileStore] Cache unavailable for '{}': {}", key, e);
                return;
            }
        }

        let mut merged = None;
        let outcome = self.file.update(Entries::new(), |entries| {
            apply(entries);
            merged = Some(entries.clone());
        });

        match outcome {
            Ok(()) => {
                if let (Some(merged), Ok(mut cache)) = (merged, self.cache.write()) {
                    *cache = merged;
                }
            }
            Err(e) => tracing::warn!("[FileStore] Write of '{}' not persisted: {}", key, e),
        }
    }
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(cache) => cache.get(key).cloned(),
            Err(e) => {
                tracing::warn!("[FileStore] Read of '{}' failed: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        self.write_through(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.write_through(key, |entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivalry_core::store::PersistentStoreExt;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let store = FileStore::open(path.clone());
        store.set("theme", "dark");
        store.set_json("searchHistory", &vec!["A vs B"]);
        drop(store);

        let reopened = FileStore::open(path);
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
        let history: Vec<String> = reopened.get_json("searchHistory", Vec::new());
        assert_eq!(history, vec!["A vs B".to_string()]);
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let store = FileStore::open(path.clone());
        store.set("theme", "dark");
        store.remove("theme");
        assert_eq!(store.get("theme"), None);
        assert_eq!(FileStore::open(path).get("theme"), None);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "][").unwrap();

        let store = FileStore::open(path);
        assert_eq!(store.get("theme"), None);
        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_two_handles_merge_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let first = FileStore::open(path.clone());
        let second = FileStore::open(path.clone());
        first.set("theme", "dark");
        second.set("preferredPersonaId", "gamer");

        let reopened = FileStore::open(path);
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
        assert_eq!(reopened.get("preferredPersonaId").as_deref(), Some("gamer"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_location_keeps_working_in_memory() {
        // A regular file where the parent directory should be makes every write fail.
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let store = FileStore::open(blocker.join("state.json"));
        store.set("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
