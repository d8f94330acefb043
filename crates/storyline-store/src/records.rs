//! Local cache of script records and their content.
//!
//! The record list lives under a single key as a JSON array; each script's
//! content lives under its own key so autosave never rewrites the list.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use log::{debug, warn};
use std::sync::Arc;
use storyline_protocol::{Script, ScriptId};

/// Key holding the JSON-encoded record list.
pub const RECORDS_KEY: &str = "script_projects";

/// Key holding the raw content of one script.
pub fn content_key(id: ScriptId) -> String {
    format!("script_content_{id}")
}

/// Record and content cache over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalRecordStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalRecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Cached records, or an empty list when nothing usable is stored.
    pub fn list_records(&self) -> Vec<Script> {
        let raw = match self.kv.get_item(RECORDS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read cached records: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("discarding unparsable cached records (len={}): {err}", raw.len());
                Vec::new()
            }
        }
    }

    /// Overwrite the whole cached list.
    pub fn save_records(&self, records: &[Script]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(records)?;
        self.kv.set_item(RECORDS_KEY, &encoded)?;
        debug!("saved cached records (count={})", records.len());
        Ok(())
    }

    /// Cached content for `id`; missing or unreadable content is empty.
    pub fn get_content(&self, id: ScriptId) -> String {
        match self.kv.get_item(&content_key(id)) {
            Ok(content) => content.unwrap_or_default(),
            Err(err) => {
                warn!("failed to read cached content (script_id={id}): {err}");
                String::new()
            }
        }
    }

    pub fn save_content(&self, id: ScriptId, content: &str) -> Result<(), StoreError> {
        self.kv.set_item(&content_key(id), content)?;
        debug!("saved cached content (script_id={}, len={})", id, content.len());
        Ok(())
    }

    /// Remove cached content for `id`; removing twice is a no-op.
    pub fn delete_content(&self, id: ScriptId) -> Result<(), StoreError> {
        self.kv.remove_item(&content_key(id))
    }
}
