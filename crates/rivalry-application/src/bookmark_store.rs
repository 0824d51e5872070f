//! Saved comparisons.

use rivalry_core::analysis::{AnalysisResult, SavedComparison};
use rivalry_core::clock::Clock;
use rivalry_core::store::{PersistentStore, PersistentStoreExt, keys};
use std::sync::{Arc, Mutex, MutexGuard};

/// Bookmarked results, newest first, backed by the `savedComparisons` key.
///
/// Membership is decided by result identity, so toggling the same result
/// twice always restores the original state.
pub struct BookmarkStore {
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    saved: Mutex<Vec<SavedComparison>>,
}

impl BookmarkStore {
    pub fn new(store: Arc<dyn PersistentStore>, clock: Arc<dyn Clock>) -> Self {
        let saved = store.get_json(keys::SAVED_COMPARISONS, Vec::new());
        Self {
            store,
            clock,
            saved: Mutex::new(saved),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SavedComparison>> {
        self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, saved: &[SavedComparison]) {
        self.store.set_json(keys::SAVED_COMPARISONS, saved);
    }

    /// Saves `result`, or unsaves it if already saved. Returns the new membership.
    pub fn toggle(&self, result: &AnalysisResult) -> bool {
        let mut saved = self.lock();
        let now_saved = match saved.iter().position(|s| s.result.same_search(result)) {
            Some(index) => {
                let removed = saved.remove(index);
                tracing::debug!("[Bookmarks] Unsaved {}", removed.id);
                false
            }
            None => {
                let entry = SavedComparison::new(result.clone(), self.clock.now_millis());
                tracing::debug!("[Bookmarks] Saved {} as {}", result.query, entry.id);
                saved.insert(0, entry);
                true
            }
        };
        self.persist(&saved);
        now_saved
    }

    pub fn is_saved(&self, result: &AnalysisResult) -> bool {
        self.lock().iter().any(|s| s.result.same_search(result))
    }

    /// Deletes the bookmark with the generated `id`.
    pub fn remove(&self, id: &str) -> bool {
        let mut saved = self.lock();
        let before = saved.len();
        saved.retain(|s| s.id != id);
        let removed = saved.len() != before;
        if removed {
            self.persist(&saved);
        }
        removed
    }

    pub fn list(&self) -> Vec<SavedComparison> {
        self.lock().clone()
    }

    pub fn find(&self, id: &str) -> Option<SavedComparison> {
        self.lock().iter().find(|s| s.id == id).cloned()
    }
}
