//! Configuration schema for Storyline.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Backend root used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
/// Request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root config for the Storyline client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorylineConfig {
    #[serde(default, rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl StorylineConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> StorylineConfigBuilder {
        StorylineConfigBuilder::new()
    }
}

/// Builder for assembling a `StorylineConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct StorylineConfigBuilder {
    config: StorylineConfig,
}

impl StorylineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: StorylineConfig::default(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.api.timeout_secs = timeout_secs;
        self
    }

    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage.path = Some(path.into());
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.config.sync.offline = offline;
        self
    }

    pub fn build(self) -> StorylineConfig {
        self.config
    }
}

/// Remote backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where the local record store keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Defaults to the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, or the platform data directory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_storage_path)
    }
}

/// Platform data directory for Storyline, e.g. `~/.local/share/storyline`.
pub fn default_storage_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "storyline").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Remote/local decision settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Skip the network entirely, even with a valid session.
    #[serde(default)]
    pub offline: bool,
}
