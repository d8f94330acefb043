//! Reading `storyline.json5` layers from disk.

use super::{
    ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, LoadedLayer,
    SYSTEM_CONFIG_PATH, schema,
};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Absent files are skipped; system, user, project and cwd layers are all optional.
pub(super) fn load_optional_layer(
    source: ConfigLayerSource,
    path: Option<&Path>,
) -> Result<Option<LoadedLayer>, ConfigError> {
    let Some(path) = path.filter(|path| path.exists()) else {
        debug!("skipping {source:?} layer, no file found");
        return Ok(None);
    };
    load_required_layer(source, path).map(Some)
}

/// Parses one JSON5 file and rejects keys outside the `api`, `storage` and `sync` tables.
///
/// Used directly for the runtime layer, which must exist when given.
pub(super) fn load_required_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    debug!("reading {source:?} layer from {}", path.display());
    let value: Value = json5::from_str(&fs::read_to_string(path)?)?;
    schema::validate_layer_schema(&value, &layer_label(source, path))?;
    let meta = ConfigLayer {
        source,
        path: Some(path.to_path_buf()),
    };
    Ok(LoadedLayer { meta, value })
}

/// `user(/home/me/.storyline/storyline.json5)`, as shown in schema errors.
pub(super) fn layer_label(source: ConfigLayerSource, path: &Path) -> String {
    let name = match source {
        ConfigLayerSource::System => "system",
        ConfigLayerSource::User => "user",
        ConfigLayerSource::Project => "project",
        ConfigLayerSource::Cwd => "cwd",
        ConfigLayerSource::Runtime => "runtime",
        ConfigLayerSource::Env => "env",
    };
    format!("{name}({})", path.display())
}

/// `/etc/storyline/storyline.json5`, or its ProgramData counterpart on Windows.
#[cfg(any(unix, windows))]
pub(super) fn default_system_config_path() -> Option<PathBuf> {
    Some(PathBuf::from(SYSTEM_CONFIG_PATH))
}

/// No shared config root on this platform.
#[cfg(not(any(unix, windows)))]
pub(super) fn default_system_config_path() -> Option<PathBuf> {
    None
}

/// `~/.storyline/storyline.json5` for the current user.
pub(super) fn default_user_config_path() -> Option<PathBuf> {
    let home = UserDirs::new()?.home_dir().to_path_buf();
    Some(home.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
}
