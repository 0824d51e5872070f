//! Infrastructure layer for Rivalry: file locations, configuration loading,
//! the file-backed persistent store and the URL share link.

pub mod config_service;
pub mod paths;
pub mod share_link;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::RivalryPaths;
pub use crate::share_link::UrlShareLink;
pub use crate::storage::FileStore;
