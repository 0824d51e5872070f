//! Per-row thumbs up/down on a comparison table.

use rivalry_core::analysis::AnalysisResult;
use rivalry_core::feedback::{RowFeedback, RowVote, Vote};
use rivalry_core::store::{PersistentStore, PersistentStoreExt, keys};
use std::sync::Arc;

/// Stores row votes under `feedback_<result id>`.
///
/// Votes are read straight from the store; there is no in-memory copy to keep
/// in sync.
pub struct FeedbackLedger {
    store: Arc<dyn PersistentStore>,
}

impl FeedbackLedger {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self { store }
    }

    /// Applies `vote` to `row` and returns the row's new state.
    pub fn vote(&self, result: &AnalysisResult, row: usize, vote: Vote) -> RowVote {
        let key = keys::feedback(&result.identity());
        let mut feedback: RowFeedback = self.store.get_json(&key, RowFeedback::new());

        let updated = feedback.get(&row).copied().unwrap_or_default().apply(vote);
        if updated.is_empty() {
            feedback.remove(&row);
        } else {
            feedback.insert(row, updated);
        }

        if feedback.is_empty() {
            self.store.remove(&key);
        } else {
            self.store.set_json(&key, &feedback);
        }
        updated
    }

    pub fn get(&self, result: &AnalysisResult) -> RowFeedback {
        self.store
            .get_json(&keys::feedback(&result.identity()), RowFeedback::new())
    }

    pub fn row(&self, result: &AnalysisResult, row: usize) -> RowVote {
        self.get(result).get(&row).copied().unwrap_or_default()
    }
}
