//! Local persistence for Storyline: a small key-value layer plus the script
//! record and token stores built on it.

pub mod error;
pub mod kv;
pub mod records;
pub mod tokens;

/// Store error type.
pub use error::StoreError;
/// Key-value abstraction and its file/in-memory backends.
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
/// Script record cache.
pub use records::{LocalRecordStore, RECORDS_KEY, content_key};
/// Persisted session tokens.
pub use tokens::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStore};
