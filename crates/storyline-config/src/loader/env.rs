//! `STORYLINE_*` environment overrides, turned into a config layer.

use super::schema::invalid_field;
use crate::ConfigError;
use serde_json::{Map, Value, json};

pub(super) const ENV_PREFIX: &str = "STORYLINE_";

pub const ENV_API_BASE_URL: &str = "STORYLINE_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "STORYLINE_TIMEOUT_SECS";
pub const ENV_OFFLINE: &str = "STORYLINE_OFFLINE";
pub const ENV_STORAGE_PATH: &str = "STORYLINE_STORAGE_PATH";

/// Build the override layer; `None` when no recognized variable is set.
///
/// Unrecognized `STORYLINE_*` names are ignored. Later duplicates win.
pub(super) fn overrides(vars: &[(String, String)]) -> Result<Option<Value>, ConfigError> {
    let mut api = Map::new();
    let mut storage = Map::new();
    let mut sync = Map::new();

    for (key, value) in vars {
        match key.as_str() {
            ENV_API_BASE_URL => {
                api.insert("base_url".to_string(), json!(value.trim()));
            }
            ENV_TIMEOUT_SECS => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid_field("env", key, "expected non-negative integer"))?;
                api.insert("timeout_secs".to_string(), json!(secs));
            }
            ENV_OFFLINE => {
                sync.insert("offline".to_string(), json!(parse_flag(key, value)?));
            }
            ENV_STORAGE_PATH => {
                storage.insert("path".to_string(), json!(value));
            }
            _ => {}
        }
    }

    let mut layer = Map::new();
    for (name, section) in [("api", api), ("storage", storage), ("sync", sync)] {
        if !section.is_empty() {
            layer.insert(name.to_string(), Value::Object(section));
        }
    }
    Ok((!layer.is_empty()).then_some(Value::Object(layer)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid_field("env", key, "expected boolean flag")),
    }
}
