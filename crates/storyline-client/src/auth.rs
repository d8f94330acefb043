//! Auth endpoints. None of these carry a bearer token.

use crate::error::GatewayError;
use crate::http::HttpGateway;
use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use storyline_protocol::{Credentials, Registration, TokenPair, User};

#[async_trait]
/// Remote authentication operations.
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/login`, form-encoded.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, GatewayError>;

    /// `POST /auth/register`, JSON.
    async fn register(&self, registration: &Registration) -> Result<User, GatewayError>;

    /// `POST /auth/refresh?refresh_token=...`
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, GatewayError>;

    /// `POST /auth/logout?refresh_token=...`
    async fn logout(&self, refresh_token: &str) -> Result<(), GatewayError>;
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, GatewayError> {
        debug!("POST /auth/login");
        self.send_json(self.request(Method::POST, "/auth/login").form(credentials))
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<User, GatewayError> {
        debug!("POST /auth/register");
        self.send_json(
            self.request(Method::POST, "/auth/register")
                .json(registration),
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, GatewayError> {
        debug!("POST /auth/refresh");
        self.send_json(
            self.request(Method::POST, "/auth/refresh")
                .query(&[("refresh_token", refresh_token)]),
        )
        .await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), GatewayError> {
        debug!("POST /auth/logout");
        self.send_empty(
            self.request(Method::POST, "/auth/logout")
                .query(&[("refresh_token", refresh_token)]),
        )
        .await
    }
}
