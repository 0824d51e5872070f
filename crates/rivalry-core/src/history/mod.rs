//! Search history domain module.
//!
//! - `model`: `HistoryEntry` and the legacy-format migration
//! - `stats`: time-windowed activity counts and trends

mod model;
mod stats;

pub use model::{HISTORY_LIMIT, HistoryEntry, StoredHistory, migrate};
pub use stats::{DAY_MS, WEEK_MS, WindowStats, window_stats};
