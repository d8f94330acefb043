//! Service wiring from configuration.

use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyline_client::{GatewayError, GatewayOptions, HttpGateway};
use storyline_config::{ConfigError, StorylineConfig};
use storyline_core::{AuthService, ScriptService, SessionValidator, SystemClock};
use storyline_store::{FileKeyValueStore, LocalRecordStore, StoreError, TokenStore};
use thiserror::Error;

/// Errors raised while assembling a [`Storyline`] client.
#[derive(Debug, Error)]
pub enum StorylineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No storage path configured and no platform data directory available.
    #[error("no storage path configured and no platform data directory found")]
    NoStoragePath,
}

/// Snapshot reported by `storyline status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub base_url: String,
    pub offline: bool,
    pub session_valid: bool,
    pub cached_scripts: usize,
    pub storage_path: PathBuf,
}

/// Script and auth services sharing one on-disk store and one gateway.
#[derive(Clone)]
pub struct Storyline {
    config: StorylineConfig,
    storage_path: PathBuf,
    scripts: ScriptService,
    auth: AuthService,
}

impl Storyline {
    /// Build clients from a validated config, storing data at the configured path.
    pub fn from_config(config: StorylineConfig) -> Result<Self, StorylineError> {
        let storage_path = config
            .storage
            .resolved_path()
            .ok_or(StorylineError::NoStoragePath)?;
        Self::open(config, &storage_path)
    }

    /// Build clients storing data under `storage_path`, ignoring `config.storage`.
    pub fn open(config: StorylineConfig, storage_path: &Path) -> Result<Self, StorylineError> {
        config.validate()?;
        let kv = Arc::new(FileKeyValueStore::new(storage_path)?);
        let gateway = Arc::new(HttpGateway::new(
            GatewayOptions::new(config.api.base_url.clone()).with_timeout(config.api.timeout()),
        )?);
        let clock = Arc::new(SystemClock);
        let records = LocalRecordStore::new(kv.clone());
        let tokens = TokenStore::new(kv);
        let session = SessionValidator::new(tokens, clock.clone());
        let scripts = ScriptService::new(gateway.clone(), records, session.clone(), clock)
            .with_offline(config.sync.offline);
        let auth = AuthService::new(gateway, session);
        info!(
            "storyline client ready (base_url={}, offline={}, storage={})",
            config.api.base_url,
            config.sync.offline,
            storage_path.display()
        );
        Ok(Self {
            config,
            storage_path: storage_path.to_path_buf(),
            scripts,
            auth,
        })
    }

    pub fn config(&self) -> &StorylineConfig {
        &self.config
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn scripts(&self) -> &ScriptService {
        &self.scripts
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn status(&self) -> Status {
        let cached_scripts = self.scripts.records().list_records().len();
        debug!("status requested (cached_scripts={cached_scripts})");
        Status {
            base_url: self.config.api.base_url.clone(),
            offline: self.scripts.is_offline(),
            session_valid: self.auth.is_session_valid(),
            cached_scripts,
            storage_path: self.storage_path.clone(),
        }
    }
}
