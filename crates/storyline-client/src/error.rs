//! Error types for gateway calls.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Base URL failed to parse or uses an unsupported scheme.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// The underlying HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(String),
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),
    /// No response was received within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The server answered with a non-2xx status.
    #[error("http error {status}{}", describe_body(.body))]
    Http { status: u16, body: Option<Value> },
    /// A 2xx body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// HTTP status for [`GatewayError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when no response was received (transport failure or timeout).
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Timeout(_))
    }
}

/// Render the server's `detail` field, or the raw body, after the status.
fn describe_body(body: &Option<Value>) -> String {
    match body {
        None => String::new(),
        Some(Value::Object(map)) => match map.get("detail").or_else(|| map.get("message")) {
            Some(Value::String(detail)) => format!(": {detail}"),
            Some(other) => format!(": {other}"),
            None => format!(": {}", Value::Object(map.clone())),
        },
        Some(Value::String(text)) => format!(": {text}"),
        Some(other) => format!(": {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::GatewayError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn http_error_shows_server_detail() {
        let err = GatewayError::Http {
            status: 400,
            body: Some(json!({ "detail": "Script with this title already exists" })),
        };
        assert_eq!(
            err.to_string(),
            "http error 400: Script with this title already exists"
        );
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn classifies_unauthorized_and_network() {
        let err = GatewayError::Http {
            status: 401,
            body: None,
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "http error 401");
        assert!(GatewayError::Timeout(Duration::from_secs(30)).is_network());
        assert!(GatewayError::Network("refused".to_string()).is_network());
        assert!(!err.is_network());
    }
}
