//! # Configuration
//!
//! Settings are resolved field by field, first match wins:
//!
//! 1. command-line flag or its environment variable (`OPENAI_API_KEY`, ...)
//! 2. the optional YAML file passed with `--config`
//! 3. built-in defaults
//!
//! ```yaml
//! addr: 0.0.0.0:3000
//! data_dir: /var/lib/amock
//! openai:
//!   base_url: http://localhost:11434/v1
//!   model: qwen2.5
//!   timeout_secs: 120
//! ```

use crate::llm::OpenAiSettings;
use crate::runtime_config::RuntimeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Shape of the YAML config file; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub addr: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub openai: OpenAiFileConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiFileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid YAML for this shape.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub addr: String,
    pub data_dir: PathBuf,
    pub openai: OpenAiSettings,
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Merge overrides, the optional config file and defaults.
    ///
    /// # Errors
    ///
    /// Fails only when `config_path` is given and cannot be loaded.
    pub fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, overrides))
    }

    #[must_use]
    pub fn resolve(file: FileConfig, overrides: ConfigOverrides) -> Self {
        let defaults = OpenAiSettings::default();
        let openai = OpenAiSettings {
            api_key: overrides
                .api_key
                .or(file.openai.api_key)
                .unwrap_or(defaults.api_key),
            base_url: overrides
                .base_url
                .or(file.openai.base_url)
                .unwrap_or(defaults.base_url),
            model: overrides
                .model
                .or(file.openai.model)
                .unwrap_or(defaults.model),
            timeout: overrides
                .timeout_secs
                .or(file.openai.timeout_secs)
                .map_or(defaults.timeout, Duration::from_secs),
        };
        Self {
            addr: overrides
                .addr
                .or(file.addr)
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            data_dir: overrides
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            openai,
            runtime: RuntimeConfig::from_env(),
        }
    }
}
