//! Search history entries and their persisted form.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Most entries the history keeps.
pub const HISTORY_LIMIT: usize = 20;

/// One past query. Identity is the exact, case-sensitive query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(query: impl Into<String>, timestamp: i64) -> Self {
        Self {
            query: query.into(),
            timestamp,
        }
    }
}

/// History as it may be found in storage.
///
/// Early builds stored a bare list of query strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredHistory {
    Entries(Vec<HistoryEntry>),
    Legacy(Vec<String>),
}

impl StoredHistory {
    pub fn len(&self) -> usize {
        match self {
            Self::Entries(entries) => entries.len(),
            Self::Legacy(queries) => queries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Upgrades stored history to entries, stamping legacy queries with `now`.
///
/// Either format comes out with unique queries (first occurrence wins) and at
/// most [`HISTORY_LIMIT`] entries, so applying this to an already-migrated
/// history is a no-op.
pub fn migrate(raw: StoredHistory, now: i64) -> Vec<HistoryEntry> {
    let entries = match raw {
        StoredHistory::Entries(entries) => entries,
        StoredHistory::Legacy(queries) => queries
            .into_iter()
            .map(|query| HistoryEntry::new(query, now))
            .collect(),
    };

    let mut seen = HashSet::new();
    let mut entries: Vec<HistoryEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.query.clone()))
        .collect();
    entries.truncate(HISTORY_LIMIT);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_strings_are_upgraded() {
        let raw: StoredHistory = serde_json::from_str(r#"["A vs B", "C vs D"]"#).unwrap();
        let entries = migrate(raw, 1_000);
        assert_eq!(
            entries,
            vec![HistoryEntry::new("A vs B", 1_000), HistoryEntry::new("C vs D", 1_000)]
        );
    }

    #[test]
    fn test_migration_is_idempotent() {
        let raw: StoredHistory = serde_json::from_str(r#"["A vs B"]"#).unwrap();
        let once = migrate(raw, 1_000);

        let reparsed: StoredHistory =
            serde_json::from_str(&serde_json::to_string(&once).unwrap()).unwrap();
        assert_eq!(migrate(reparsed, 9_999), once);
    }

    #[test]
    fn test_oversized_legacy_list_is_deduped_and_capped() {
        let mut queries: Vec<String> = (0..22).map(|i| format!("q{i}")).collect();
        queries.insert(3, "q0".to_string());
        queries.insert(7, "q1".to_string());
        queries.push("q5".to_string());
        let raw = StoredHistory::Legacy(queries);
        assert_eq!(raw.len(), 25);

        let entries = migrate(raw, 1_000);
        assert_eq!(entries.len(), HISTORY_LIMIT);
        let unique: HashSet<_> = entries.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(unique.len(), entries.len());
        assert_eq!(entries[0].query, "q0");
        assert_eq!(entries[HISTORY_LIMIT - 1].query, "q19");
    }

    #[test]
    fn test_duplicate_entries_keep_first_occurrence() {
        let raw: StoredHistory = serde_json::from_str(
            r#"[{"query":"A","timestamp":3},{"query":"B","timestamp":2},{"query":"A","timestamp":1}]"#,
        )
        .unwrap();
        assert_eq!(
            migrate(raw, 0),
            vec![HistoryEntry::new("A", 3), HistoryEntry::new("B", 2)]
        );
    }

    #[test]
    fn test_empty_list_parses() {
        let raw: StoredHistory = serde_json::from_str("[]").unwrap();
        assert!(migrate(raw, 0).is_empty());
    }

    #[test]
    fn test_mixed_content_is_rejected() {
        let parsed = serde_json::from_str::<StoredHistory>(r#"["A", {"query": "B", "timestamp": 1}]"#);
        assert!(parsed.is_err());
    }
}
