//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default so a missing or partial file still yields a usable
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::share::DEFAULT_SHARE_PARAM;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://rivalry.app/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RivalryConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Instruction placed before the user's query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            prompt_prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_param")]
    pub param: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            param: default_param(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the state file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

fn default_param() -> String {
    DEFAULT_SHARE_PARAM.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: RivalryConfig = toml::from_str("").unwrap();
        assert_eq!(config, RivalryConfig::default());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.share.param, "q");
    }

    #[test]
    fn test_partial_section() {
        let config: RivalryConfig = toml::from_str(
            r#"
[gemini]
timeout_secs = 5

[share]
param = "compare"
"#,
        )
        .unwrap();
        assert_eq!(config.gemini.timeout_secs, 5);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.share.param, "compare");
        assert_eq!(config.share.base_url, DEFAULT_SHARE_BASE_URL);
    }
}
