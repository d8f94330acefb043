//! Scripted in-memory stand-in for the HTTP backend.

use crate::jwt::jwt_with_exp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::json;
use std::time::Duration;
use storyline_client::{AuthGateway, GatewayError, ScriptGateway};
use storyline_protocol::{
    Credentials, Registration, Script, ScriptCreate, ScriptId, ScriptUpdate, Suggestion,
    SuggestionKind, TokenPair, User,
};

/// How every subsequent call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Status(u16),
    Timeout,
    Network,
}

impl Failure {
    fn to_error(self) -> GatewayError {
        match self {
            Failure::Status(status) => GatewayError::Http {
                status,
                body: Some(json!({ "detail": format!("scripted failure {status}") })),
            },
            Failure::Timeout => GatewayError::Timeout(Duration::from_secs(30)),
            Failure::Network => GatewayError::Network("connection refused".to_string()),
        }
    }
}

#[derive(Debug)]
struct State {
    scripts: Vec<Script>,
    next_id: ScriptId,
    failure: Option<Failure>,
    calls: Vec<String>,
    tokens: Vec<String>,
    issued_token: String,
}

/// Backend double that records every call and serves scripts from memory.
///
/// Remote ids start at 42. [`RecordingGateway::fail_with`] makes every
/// following call fail until [`RecordingGateway::recover`].
#[derive(Debug)]
pub struct RecordingGateway {
    state: Mutex<State>,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                scripts: Vec::new(),
                next_id: 42,
                failure: None,
                calls: Vec::new(),
                tokens: Vec::new(),
                issued_token: jwt_with_exp(4_102_444_800),
            }),
        }
    }

    /// Seed remote scripts.
    pub fn with_scripts(self, scripts: Vec<Script>) -> Self {
        self.state.lock().scripts = scripts;
        self
    }

    /// Access token handed out by login and refresh.
    pub fn issuing(self, token: impl Into<String>) -> Self {
        self.state.lock().issued_token = token.into();
        self
    }

    pub fn fail_with(&self, failure: Failure) {
        self.state.lock().failure = Some(failure);
    }

    pub fn recover(&self) {
        self.state.lock().failure = None;
    }

    /// Operation names in call order, e.g. `["list", "create"]`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Bearer or refresh tokens presented, in call order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.state.lock().tokens.clone()
    }

    pub fn remote_scripts(&self) -> Vec<Script> {
        self.state.lock().scripts.clone()
    }

    fn enter(&self, op: &str, token: Option<&str>) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(op.to_string());
        if let Some(token) = token {
            state.tokens.push(token.to_string());
        }
        match state.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn not_found(id: ScriptId) -> GatewayError {
        GatewayError::Http {
            status: 404,
            body: Some(json!({ "detail": format!("Script {id} not found") })),
        }
    }

    fn issue_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.state.lock().issued_token.clone(),
            refresh_token: "refresh-token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: Some(1800),
        }
    }
}

fn server_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_557_600, 0).unwrap_or_default()
}

#[async_trait]
impl ScriptGateway for RecordingGateway {
    async fn list(&self, token: &str) -> Result<Vec<Script>, GatewayError> {
        self.enter("list", Some(token))?;
        Ok(self.remote_scripts())
    }

    async fn get(&self, token: &str, id: ScriptId) -> Result<Script, GatewayError> {
        self.enter("get", Some(token))?;
        self.state
            .lock()
            .scripts
            .iter()
            .find(|script| script.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, token: &str, data: &ScriptCreate) -> Result<Script, GatewayError> {
        self.enter("create", Some(token))?;
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let mut script = Script::local(id, data, server_time());
        script.user_id = 1;
        state.scripts.insert(0, script.clone());
        Ok(script)
    }

    async fn update(
        &self,
        token: &str,
        id: ScriptId,
        patch: &ScriptUpdate,
    ) -> Result<Script, GatewayError> {
        self.enter("update", Some(token))?;
        let mut state = self.state.lock();
        let script = state
            .scripts
            .iter_mut()
            .find(|script| script.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        patch.apply(script);
        script.updated_at = Some(server_time());
        Ok(script.clone())
    }

    async fn remove(&self, token: &str, id: ScriptId) -> Result<(), GatewayError> {
        self.enter("remove", Some(token))?;
        self.state.lock().scripts.retain(|script| script.id != id);
        Ok(())
    }

    async fn patch_content(
        &self,
        token: &str,
        id: ScriptId,
        content: &str,
    ) -> Result<(), GatewayError> {
        self.enter("patch_content", Some(token))?;
        let mut state = self.state.lock();
        let script = state
            .scripts
            .iter_mut()
            .find(|script| script.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        script.content = Some(content.to_string());
        Ok(())
    }

    async fn optimize_prompt(
        &self,
        token: &str,
        prompt: &str,
    ) -> Result<Vec<String>, GatewayError> {
        self.enter("optimize_prompt", Some(token))?;
        Ok(vec![format!("{prompt} (remote)")])
    }

    async fn optimize_content(
        &self,
        token: &str,
        content: &str,
        _script_id: Option<ScriptId>,
    ) -> Result<Vec<Suggestion>, GatewayError> {
        self.enter("optimize_content", Some(token))?;
        Ok(vec![Suggestion {
            kind: SuggestionKind::Structure,
            title: "remote".to_string(),
            description: "served by the backend".to_string(),
            suggestion: content.to_string(),
        }])
    }
}

#[async_trait]
impl AuthGateway for RecordingGateway {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, GatewayError> {
        self.enter("login", None)?;
        if credentials.password.is_empty() {
            return Err(GatewayError::Http {
                status: 401,
                body: Some(json!({ "detail": "Incorrect email or password" })),
            });
        }
        Ok(self.issue_pair())
    }

    async fn register(&self, registration: &Registration) -> Result<User, GatewayError> {
        self.enter("register", None)?;
        Ok(User {
            id: 7,
            email: registration.email.clone(),
            username: registration.username.clone(),
            full_name: None,
            bio: None,
            avatar_url: None,
            is_active: true,
            is_superuser: false,
            created_at: server_time(),
            updated_at: None,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, GatewayError> {
        self.enter("refresh", Some(refresh_token))?;
        Ok(self.issue_pair())
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), GatewayError> {
        self.enter("logout", Some(refresh_token))
    }
}
