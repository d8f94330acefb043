//! Persisted session tokens.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use log::{info, warn};
use std::sync::Arc;
use storyline_protocol::TokenPair;

/// Key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "auth_token";
/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Reads and writes the tokens issued by the auth endpoints.
#[derive(Clone)]
pub struct TokenStore {
    kv: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored access token; empty or unreadable entries count as absent.
    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Persist both tokens of a freshly issued pair.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.kv.set_item(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.kv.set_item(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        info!("stored session tokens (token_type={})", tokens.token_type);
        Ok(())
    }

    /// Replace only the access token, e.g. one supplied out of band.
    pub fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.kv.set_item(ACCESS_TOKEN_KEY, token)
    }

    /// Forget both tokens.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove_item(ACCESS_TOKEN_KEY)?;
        self.kv.remove_item(REFRESH_TOKEN_KEY)?;
        info!("cleared session tokens");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get_item(key) {
            Ok(value) => value.filter(|value| !value.trim().is_empty()),
            Err(err) => {
                warn!("failed to read {key}: {err}");
                None
            }
        }
    }
}
