//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and applies environment
//! overrides. A missing file is not an error; a malformed one is.

use crate::paths::RivalryPaths;
use rivalry_core::config::RivalryConfig;
use rivalry_core::error::{Result, RivalryError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable that overrides `gemini.api_key`.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<RivalryConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new(paths: &RivalryPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service reading an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<RivalryConfig> {
        if let Ok(cached) = self.config.read() {
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let mut loaded = Self::load_file(&self.path)?;
        apply_env_overrides(&mut loaded, std::env::var(GEMINI_API_KEY_ENV).ok());

        if let Ok(mut cache) = self.config.write() {
            *cache = Some(loaded.clone());
        }
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.config.write() {
            *cache = None;
        }
    }

    fn load_file(path: &Path) -> Result<RivalryConfig> {
        if !path.exists() {
            tracing::debug!("[Config] No config at {:?}, using defaults", path);
            return Ok(RivalryConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RivalryError::config(format!("Invalid config file {:?}: {}", path, e))
        })
    }
}

fn apply_env_overrides(config: &mut RivalryConfig, api_key: Option<String>) {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.gemini.api_key = Some(key);
    }
}
