//! Fully wired services over in-memory storage.

use crate::clock::FixedClock;
use crate::gateway::RecordingGateway;
use crate::jwt::jwt_with_exp;
use std::sync::Arc;
use storyline_core::{AuthService, Clock, ScriptService, SessionValidator};
use storyline_store::{LocalRecordStore, MemoryKeyValueStore, TokenStore};

/// 2024-05-01T10:00:00Z
pub const DEFAULT_NOW_MS: i64 = 1_714_557_600_000;

/// Script and auth services sharing one memory store, clock and gateway.
pub struct Harness {
    pub kv: Arc<MemoryKeyValueStore>,
    pub records: LocalRecordStore,
    pub tokens: TokenStore,
    pub clock: Arc<FixedClock>,
    pub gateway: Arc<RecordingGateway>,
    pub scripts: ScriptService,
    pub auth: AuthService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_gateway(RecordingGateway::new())
    }

    pub fn with_gateway(gateway: RecordingGateway) -> Self {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let records = LocalRecordStore::new(kv.clone());
        let tokens = TokenStore::new(kv.clone());
        let clock = Arc::new(FixedClock::at_ms(DEFAULT_NOW_MS));
        let gateway = Arc::new(gateway);
        let session = SessionValidator::new(tokens.clone(), clock.clone());
        let scripts = ScriptService::new(
            gateway.clone(),
            records.clone(),
            session.clone(),
            clock.clone(),
        );
        let auth = AuthService::new(gateway.clone(), session);
        Self {
            kv,
            records,
            tokens,
            clock,
            gateway,
            scripts,
            auth,
        }
    }

    /// Store an access token expiring `secs` after the clock's current time.
    pub fn sign_in_for(&self, secs: i64) -> String {
        let exp = self.clock.now_ms() / 1000 + secs;
        let token = jwt_with_exp(exp);
        self.tokens
            .set_access_token(&token)
            .unwrap_or_else(|err| panic!("store token: {err}"));
        token
    }

    /// Store a token valid for an hour.
    pub fn sign_in(&self) -> String {
        self.sign_in_for(3600)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
