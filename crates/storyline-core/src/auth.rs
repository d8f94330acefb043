//! Login, registration and token lifecycle.

use crate::error::SyncError;
use crate::session::SessionValidator;
use log::{info, warn};
use std::sync::Arc;
use storyline_client::AuthGateway;
use storyline_protocol::{Credentials, Registration, TokenPair, User};
use storyline_store::TokenStore;

/// Obtains tokens from the auth endpoints and keeps them in the [`TokenStore`].
#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    session: SessionValidator,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>, session: SessionValidator) -> Self {
        Self { gateway, session }
    }

    fn tokens(&self) -> &TokenStore {
        self.session.tokens()
    }

    pub fn is_session_valid(&self) -> bool {
        self.session.is_session_valid()
    }

    pub fn active_token(&self) -> Option<String> {
        self.session.active_token()
    }

    /// Exchange credentials for a token pair and persist it.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, SyncError> {
        let pair = self
            .gateway
            .login(&Credentials::new(username, password))
            .await?;
        self.tokens().save(&pair)?;
        info!("logged in (username={username})");
        Ok(pair)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, SyncError> {
        let user = self
            .gateway
            .register(&Registration {
                email: email.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        info!("registered account (user_id={})", user.id);
        // The backend accepts the email as the login name.
        self.login(email, password).await?;
        Ok(user)
    }

    /// Rotate the token pair using the stored refresh token.
    pub async fn refresh(&self) -> Result<TokenPair, SyncError> {
        let refresh_token = self
            .tokens()
            .refresh_token()
            .ok_or_else(|| SyncError::NotAuthenticated("no refresh token stored".to_string()))?;
        let pair = self.gateway.refresh(&refresh_token).await?;
        self.tokens().save(&pair)?;
        info!("refreshed session tokens");
        Ok(pair)
    }

    /// Revoke remotely when possible; local tokens are cleared either way.
    pub async fn logout(&self) -> Result<(), SyncError> {
        if let Some(refresh_token) = self.tokens().refresh_token() {
            if let Err(err) = self.gateway.logout(&refresh_token).await {
                warn!("remote logout failed, clearing local session anyway: {err}");
            }
        }
        self.tokens().clear()?;
        Ok(())
    }
}
