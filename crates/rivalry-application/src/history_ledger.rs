//! Most-recently-used search history.

use rivalry_core::clock::Clock;
use rivalry_core::history::{
    DAY_MS, HISTORY_LIMIT, HistoryEntry, StoredHistory, WEEK_MS, WindowStats, migrate,
    window_stats,
};
use rivalry_core::store::{PersistentStore, PersistentStoreExt, keys};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Activity for the last day and the last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendSummary {
    pub day: WindowStats,
    pub week: WindowStats,
}

/// Ordered, deduplicated list of past queries, newest first.
///
/// Backed by the `searchHistory` key. Legacy string-only history is upgraded
/// when the ledger is opened.
pub struct HistoryLedger {
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn PersistentStore>, clock: Arc<dyn Clock>) -> Self {
        let entries = Self::load(store.as_ref(), clock.now_millis());
        Self {
            store,
            clock,
            entries: Mutex::new(entries),
        }
    }

    fn load(store: &dyn PersistentStore, now: i64) -> Vec<HistoryEntry> {
        let Some(raw) = store.get(keys::SEARCH_HISTORY) else {
            return Vec::new();
        };

        match serde_json::from_str::<StoredHistory>(&raw) {
            Ok(stored) => {
                let legacy = matches!(stored, StoredHistory::Legacy(_));
                let stored_len = stored.len();
                let entries = migrate(stored, now);
                if legacy || entries.len() != stored_len {
                    tracing::info!(
                        "[History] Rewrote stored history ({} -> {} entries)",
                        stored_len,
                        entries.len()
                    );
                    store.set_json(keys::SEARCH_HISTORY, &entries);
                }
                entries
            }
            Err(e) => {
                tracing::warn!("[History] Discarding unreadable history: {}", e);
                Vec::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &[HistoryEntry]) {
        self.store.set_json(keys::SEARCH_HISTORY, entries);
    }

    /// Snapshot of the ledger, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    /// Moves `query` to the front with a fresh timestamp.
    pub fn record(&self, query: &str) {
        let mut entries = self.lock();
        entries.retain(|entry| entry.query != query);
        entries.insert(0, HistoryEntry::new(query, self.clock.now_millis()));
        entries.truncate(HISTORY_LIMIT);
        self.persist(&entries);
    }

    /// Deletes every entry for `query`.
    pub fn remove(&self, query: &str) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.query != query);
        let removed = entries.len() != before;
        if removed {
            self.persist(&entries);
        }
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
        self.persist(&entries);
    }

    /// Window statistics at the clock's current time.
    pub fn stats(&self, window_ms: i64) -> WindowStats {
        window_stats(&self.lock(), window_ms, self.clock.now_millis())
    }

    pub fn trend_summary(&self, now: i64) -> TrendSummary {
        let entries = self.lock();
        TrendSummary {
            day: window_stats(&entries, DAY_MS, now),
            week: window_stats(&entries, WEEK_MS, now),
        }
    }
}
