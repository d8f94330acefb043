//! Script CRUD and writing-assistant endpoints.

use crate::error::GatewayError;
use crate::http::HttpGateway;
use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use storyline_protocol::{
    ContentOptimizeRequest, ContentPatch, PromptOptimizeRequest, PromptSuggestions, Script,
    ScriptCreate, ScriptId, ScriptUpdate, Suggestion, SuggestionList,
};

#[async_trait]
/// Remote script operations, one HTTP call each, authorized by a bearer token.
pub trait ScriptGateway: Send + Sync {
    /// `GET /scripts/`
    async fn list(&self, token: &str) -> Result<Vec<Script>, GatewayError>;

    /// `GET /scripts/{id}`
    async fn get(&self, token: &str, id: ScriptId) -> Result<Script, GatewayError>;

    /// `POST /scripts/`
    async fn create(&self, token: &str, data: &ScriptCreate) -> Result<Script, GatewayError>;

    /// `PUT /scripts/{id}` with only the present fields.
    async fn update(
        &self,
        token: &str,
        id: ScriptId,
        patch: &ScriptUpdate,
    ) -> Result<Script, GatewayError>;

    /// `DELETE /scripts/{id}`
    async fn remove(&self, token: &str, id: ScriptId) -> Result<(), GatewayError>;

    /// `PATCH /scripts/{id}/content` with `{content}`.
    async fn patch_content(
        &self,
        token: &str,
        id: ScriptId,
        content: &str,
    ) -> Result<(), GatewayError>;

    /// `POST /scripts/optimize/prompt`
    async fn optimize_prompt(&self, token: &str, prompt: &str)
    -> Result<Vec<String>, GatewayError>;

    /// `POST /scripts/optimize/content`
    async fn optimize_content(
        &self,
        token: &str,
        content: &str,
        script_id: Option<ScriptId>,
    ) -> Result<Vec<Suggestion>, GatewayError>;
}

#[async_trait]
impl ScriptGateway for HttpGateway {
    async fn list(&self, token: &str) -> Result<Vec<Script>, GatewayError> {
        debug!("GET /scripts/");
        self.send_json(self.authorized(Method::GET, "/scripts/", token))
            .await
    }

    async fn get(&self, token: &str, id: ScriptId) -> Result<Script, GatewayError> {
        debug!("GET /scripts/{id}");
        self.send_json(self.authorized(Method::GET, &format!("/scripts/{id}"), token))
            .await
    }

    async fn create(&self, token: &str, data: &ScriptCreate) -> Result<Script, GatewayError> {
        debug!("POST /scripts/ (title_len={})", data.title.len());
        self.send_json(self.authorized(Method::POST, "/scripts/", token).json(data))
            .await
    }

    async fn update(
        &self,
        token: &str,
        id: ScriptId,
        patch: &ScriptUpdate,
    ) -> Result<Script, GatewayError> {
        debug!("PUT /scripts/{id}");
        self.send_json(
            self.authorized(Method::PUT, &format!("/scripts/{id}"), token)
                .json(patch),
        )
        .await
    }

    async fn remove(&self, token: &str, id: ScriptId) -> Result<(), GatewayError> {
        debug!("DELETE /scripts/{id}");
        self.send_empty(self.authorized(Method::DELETE, &format!("/scripts/{id}"), token))
            .await
    }

    async fn patch_content(
        &self,
        token: &str,
        id: ScriptId,
        content: &str,
    ) -> Result<(), GatewayError> {
        debug!("PATCH /scripts/{id}/content (len={})", content.len());
        let body = ContentPatch {
            content: content.to_string(),
        };
        self.send_empty(
            self.authorized(Method::PATCH, &format!("/scripts/{id}/content"), token)
                .json(&body),
        )
        .await
    }

    async fn optimize_prompt(
        &self,
        token: &str,
        prompt: &str,
    ) -> Result<Vec<String>, GatewayError> {
        debug!("POST /scripts/optimize/prompt (len={})", prompt.len());
        let body = PromptOptimizeRequest {
            prompt: prompt.to_string(),
        };
        let reply: PromptSuggestions = self
            .send_json(
                self.authorized(Method::POST, "/scripts/optimize/prompt", token)
                    .json(&body),
            )
            .await?;
        Ok(reply.suggestions)
    }

    async fn optimize_content(
        &self,
        token: &str,
        content: &str,
        script_id: Option<ScriptId>,
    ) -> Result<Vec<Suggestion>, GatewayError> {
        debug!("POST /scripts/optimize/content (len={})", content.len());
        let body = ContentOptimizeRequest {
            content: content.to_string(),
            script_id,
        };
        let reply: SuggestionList = self
            .send_json(
                self.authorized(Method::POST, "/scripts/optimize/content", token)
                    .json(&body),
            )
            .await?;
        Ok(reply.suggestions)
    }
}
