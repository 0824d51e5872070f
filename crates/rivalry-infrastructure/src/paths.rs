//! Unified path management for rivalry files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/rivalry/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/rivalry/      # Data directory
//! ├── state.json               # History, bookmarks, preferences, feedback
//! └── logs/                    # Application logs
//!     └── rivalry.log.YYYY-MM-DD
//! ```
//!
//! Passing a base directory roots every path under it instead, which is how
//! tests and portable installs keep state out of the user's home.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "rivalry";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for rivalry_core::RivalryError {
    fn from(err: PathError) -> Self {
        rivalry_core::RivalryError::config(err.to_string())
    }
}

/// Resolves every file location the application uses.
#[derive(Debug, Clone, Default)]
pub struct RivalryPaths {
    base: Option<PathBuf>,
}

impl RivalryPaths {
    /// Creates a resolver; `base` overrides the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g., `~/.config/rivalry/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g., `~/.local/share/rivalry/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// The JSON file backing the persistent store.
    pub fn state_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("state.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = RivalryPaths::new(Some(Path::new("/tmp/rivalry-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/rivalry-test/config.toml")
        );
        assert_eq!(
            paths.state_file().unwrap(),
            PathBuf::from("/tmp/rivalry-test/state.json")
        );
        assert!(paths.logs_dir().unwrap().ends_with("logs"));
    }

    #[test]
    fn test_platform_dirs_end_with_app_dir() {
        let paths = RivalryPaths::new(None);
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with(APP_DIR));
        }
        if let Ok(state_file) = paths.state_file() {
            assert!(state_file.ends_with("state.json"));
        }
    }
}
