//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file that lives in the platform
//! config directory (or wherever `--config` points).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::task::{DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

const MAX_THINKING_DELAY_MS: u64 = 10_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Task blob location
    #[serde(default)]
    pub store: StoreConfig,

    /// Conversation surface settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Defaults for new tasks
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Where and how the task blob is persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Data directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Storage key; the blob is written to `<dir>/<key>.json`
    #[serde(default = "default_key")]
    pub key: String,

    /// How long a save waits for the file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    "tasks".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Reply verbosity for the assistant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Single-line confirmations
    Compact,
    /// Markdown-emphasized replies with dates and priorities
    #[default]
    Rich,
}

/// Conversation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    /// Delay before a reply is shown
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,
}

fn default_thinking_delay_ms() -> u64 {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            thinking_delay_ms: default_thinking_delay_ms(),
        }
    }
}

/// Task defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TasksConfig {
    #[serde(default = "default_priority")]
    pub default_priority: i64,
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults
    ///
    /// A missing file is normal. An unreadable or invalid file is logged and
    /// ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to the blob file for a data directory
    pub fn store_file(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.json", self.store.key))
    }

    fn validate(&self) -> Result<()> {
        let key = self.store.key.as_str();
        if key.is_empty() {
            return Err(Error::InvalidConfig("store.key cannot be empty".to_string()));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(Error::InvalidConfig(format!(
                "store.key '{key}' may only contain letters, digits, '-' and '_'"
            )));
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.chat.thinking_delay_ms > MAX_THINKING_DELAY_MS {
            return Err(Error::InvalidConfig(format!(
                "chat.thinking_delay_ms must be <= {MAX_THINKING_DELAY_MS}"
            )));
        }
        let priority = self.tasks.default_priority;
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(Error::InvalidConfig(format!(
                "tasks.default_priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}"
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "taskmate")
}

/// Platform default for the config file
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Platform default for the data directory
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
