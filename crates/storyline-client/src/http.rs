//! reqwest-backed gateway shared by the script and auth endpoints.

use crate::error::GatewayError;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Backend root used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Per-request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// API root, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Upper bound for a whole request, body included.
    pub timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP implementation of [`crate::ScriptGateway`] and [`crate::AuthGateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    /// Base URL without a trailing slash.
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpGateway {
    /// Validate the base URL and build the HTTP client.
    pub fn new(options: GatewayOptions) -> Result<Self, GatewayError> {
        let url = Url::parse(&options.base_url)
            .map_err(|err| GatewayError::InvalidUrl(format!("{}: {err}", options.base_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(GatewayError::InvalidUrl(format!(
                "unsupported scheme {}; only http and https are supported",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|err| GatewayError::Client(err.to_string()))?;

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            timeout: options.timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against `{base_url}{path}`.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Start a request carrying the bearer token.
    pub(crate) fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    /// Send a request and map non-2xx statuses to [`GatewayError::Http`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = response.status();
        debug!(
            "gateway response (path={}, status={})",
            response.url().path(),
            status.as_u16()
        );
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;
        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        };
        Err(GatewayError::Http {
            status: status.as_u16(),
            body,
        })
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        serde_json::from_slice(&bytes).map_err(|err| GatewayError::InvalidResponse(err.to_string()))
    }

    /// Send a request whose success body is irrelevant.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), GatewayError> {
        self.send(request).await.map(|_| ())
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}
