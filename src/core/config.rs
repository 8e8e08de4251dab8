//! Configuration management for Playrun.
//!
//! Handles loading configuration from TOML files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::{ExtraVars, DEFAULT_TOOL};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".playrun.toml";

/// Default playbook, relative to the project root.
pub const DEFAULT_PLAYBOOK: &str = "ansible/playbooks/deploy.yml";

/// Default inventory host.
pub const DEFAULT_HOST: &str = "localhost";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment target settings
    pub deploy: DeployConfig,

    /// Extra variables passed to every run, ordered by key
    pub vars: BTreeMap<String, String>,
}

/// Deployment target settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Playbook to run
    pub playbook: String,

    /// Inventory host or group
    pub host: String,

    /// Playbook runner binary
    pub tool: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            playbook: DEFAULT_PLAYBOOK.to_string(),
            host: DEFAULT_HOST.to_string(),
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.playrun.toml` in current directory
    /// 2. `~/.config/playrun/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config)
                .map(|config| (config, ConfigSource::File(local_config)));
        }

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config)
                    .map(|config| (config, ConfigSource::File(global_config)));
            }
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Load from an explicit path if given, otherwise from the default chain.
    pub fn load_with_override(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path)
                .map(|config| (config, ConfigSource::File(path.to_path_buf()))),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let config: Self = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Path of the global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("playrun"))
    }

    /// Configured extra variables in key order.
    pub fn extra_vars(&self) -> ExtraVars {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    /// Playbook path with `~` and environment variables expanded.
    pub fn expanded_playbook(&self) -> Result<PathBuf, ConfigError> {
        expand_path(&self.deploy.playbook)
    }
}

/// Expand `~` and `$VAR` in a configured path.
pub fn expand_path(value: &str) -> Result<PathBuf, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|e| ConfigError::Expand { value: value.to_string(), message: e.to_string() })
}
