//! Client-side session validity check.
//!
//! The bearer token is a JWT whose payload is decoded *without* verifying the
//! signature. The result is only a hint for choosing the remote or local
//! path; the backend still has the final word via 401.

use crate::clock::Clock;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use log::debug;
use serde_json::Value;
use std::sync::Arc;
use storyline_store::TokenStore;

/// base64url with optional padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the payload segment of a three-part token.
///
/// Returns `None` for anything that is not `header.payload.signature` with a
/// base64url JSON payload.
pub fn decode_claims(token: &str) -> Option<Value> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!("token rejected: expected 3 segments, found {}", parts.len());
        return None;
    }
    let bytes = match PAYLOAD_ENGINE.decode(parts[1]) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("token rejected: payload is not base64url: {err}");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("token rejected: payload is not JSON: {err}");
            None
        }
    }
}

/// True when `token` decodes and its `exp` claim, if any, is not in the past.
pub fn token_is_live(token: &str, now_ms: i64) -> bool {
    let Some(claims) = decode_claims(token) else {
        return false;
    };
    match claims.get("exp").and_then(Value::as_f64) {
        Some(exp) if exp * 1000.0 < now_ms as f64 => {
            debug!("token rejected: expired at {exp}");
            false
        }
        _ => true,
    }
}

/// Answers "should we try the network?" from the stored access token.
#[derive(Clone)]
pub struct SessionValidator {
    tokens: TokenStore,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(tokens: TokenStore, clock: Arc<dyn Clock>) -> Self {
        Self { tokens, clock }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_session_valid(&self) -> bool {
        self.active_token().is_some()
    }

    /// The stored access token, only when it passes the validity check.
    pub fn active_token(&self) -> Option<String> {
        let token = self.tokens.access_token()?;
        token_is_live(&token, self.clock.now_ms()).then_some(token)
    }
}
