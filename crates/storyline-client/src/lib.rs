//! HTTP gateway to the Storyline backend.
//!
//! Each gateway call is a single request: no retries, no caching. Status
//! interpretation (e.g. falling back on 401) belongs to the caller.

pub mod auth;
pub mod error;
pub mod http;
pub mod scripts;

/// Auth endpoint abstraction.
pub use auth::AuthGateway;
/// Gateway error type.
pub use error::GatewayError;
/// reqwest-backed gateway and its options.
pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GatewayOptions, HttpGateway};
/// Script endpoint abstraction.
pub use scripts::ScriptGateway;
