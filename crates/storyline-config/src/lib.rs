//! Configuration models and layered config loading.
//!
//! This crate owns the Storyline config schema, validation, and the
//! layer-merging logic used by the SDK and the CLI.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{
    ConfigLayer, ConfigLayerSource, ENV_API_BASE_URL, ENV_OFFLINE, ENV_STORAGE_PATH,
    ENV_TIMEOUT_SECS, LayeredConfig, LayeredConfigOptions,
};
/// Configuration schema models.
pub use model::*;
