//! Script records and the create/update payloads sent to the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a script, server-assigned or client-generated.
pub type ScriptId = i64;

/// Duration applied when a create payload omits one.
pub const DEFAULT_DURATION_MINUTES: u32 = 5;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Lifecycle status of a script.
///
/// The backend stores status as a free-form string, so unknown values are
/// preserved in [`ScriptStatus::Other`] instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScriptStatus {
    #[default]
    Draft,
    Generating,
    Completed,
    Other(String),
}

impl ScriptStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ScriptStatus::Draft => "draft",
            ScriptStatus::Generating => "generating",
            ScriptStatus::Completed => "completed",
            ScriptStatus::Other(value) => value,
        }
    }
}

impl From<String> for ScriptStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => ScriptStatus::Draft,
            "generating" => ScriptStatus::Generating,
            "completed" => ScriptStatus::Completed,
            _ => ScriptStatus::Other(value),
        }
    }
}

impl From<&str> for ScriptStatus {
    fn from(value: &str) -> Self {
        ScriptStatus::from(value.to_string())
    }
}

impl From<ScriptStatus> for String {
    fn from(value: ScriptStatus) -> Self {
        match value {
            ScriptStatus::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Script metadata as returned by the backend and cached locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: ScriptId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Target length in minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub status: ScriptStatus,
    /// Owning user; `0` for records that never reached the server.
    #[serde(default)]
    pub user_id: i64,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Script {
    /// Build a record that exists only on this device.
    pub fn local(id: ScriptId, data: &ScriptCreate, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title.clone(),
            description: data.description.clone(),
            content: data.content.clone(),
            genre: data.genre.clone(),
            target_audience: data.target_audience.clone(),
            duration: data.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: data.status.clone().unwrap_or_default(),
            user_id: 0,
            created_at,
            updated_at: None,
        }
    }
}

/// Payload for creating a script. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScriptStatus>,
}

impl ScriptCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScriptStatus>,
}

impl ScriptUpdate {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self == &ScriptUpdate::default()
    }

    /// Overlay the present fields onto `script`.
    pub fn apply(&self, script: &mut Script) {
        if let Some(title) = &self.title {
            script.title = title.clone();
        }
        if let Some(description) = &self.description {
            script.description = Some(description.clone());
        }
        if let Some(content) = &self.content {
            script.content = Some(content.clone());
        }
        if let Some(genre) = &self.genre {
            script.genre = Some(genre.clone());
        }
        if let Some(target_audience) = &self.target_audience {
            script.target_audience = Some(target_audience.clone());
        }
        if let Some(duration) = self.duration {
            script.duration = duration;
        }
        if let Some(status) = &self.status {
            script.status = status.clone();
        }
    }
}

/// Body of the content autosave endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPatch {
    pub content: String,
}
