//! Domain layer for Rivalry.
//!
//! Holds the comparison data model, the extraction policy that turns model
//! output into it, and the seams (`PersistentStore`, `ShareLink`, `Clock`,
//! and the two model services) that the application layer is built on.

pub mod analysis;
pub mod clock;
pub mod comparison;
pub mod config;
pub mod error;
pub mod extraction;
pub mod feedback;
pub mod history;
pub mod persona;
pub mod share;
pub mod store;
pub mod theme;

// Re-export common error type
pub use error::{Result, RivalryError};
