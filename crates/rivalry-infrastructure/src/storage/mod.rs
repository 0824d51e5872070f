//! Storage layer: atomic file writes and the file-backed store.

mod atomic_json;
mod file_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_store::FileStore;
