//! Wire types shared by the Storyline gateway, local store, and services.

mod auth;
mod optimize;
mod script;
pub mod timestamp;

pub use auth::{Credentials, Registration, TokenPair, User};
pub use optimize::{
    ContentOptimizeRequest, PromptOptimizeRequest, PromptSuggestions, Suggestion,
    SuggestionKind, SuggestionList,
};
pub use script::{
    ContentPatch, DEFAULT_DURATION_MINUTES, Script, ScriptCreate, ScriptId, ScriptStatus,
    ScriptUpdate,
};
