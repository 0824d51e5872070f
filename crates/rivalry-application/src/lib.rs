//! Application layer for Rivalry.
//!
//! Stateful components built on the domain seams in `rivalry-core`. Each one
//! owns exactly one store key (or key family) and keeps an in-memory view of
//! it behind a lock.

pub mod bookmark_store;
pub mod feedback_ledger;
pub mod history_ledger;
pub mod persona_cache;
pub mod session_coordinator;
pub mod theme_preference;

#[cfg(test)]
mod testing;

pub use bookmark_store::BookmarkStore;
pub use feedback_ledger::FeedbackLedger;
pub use history_ledger::{HistoryLedger, TrendSummary};
pub use persona_cache::{PersonaCache, PersonaSnapshot, PersonaState};
pub use session_coordinator::{GENERIC_ERROR_MESSAGE, SessionCoordinator, SessionState};
pub use theme_preference::ThemePreference;
