//! Error types for the synchronizing services.

use storyline_client::GatewayError;
use storyline_protocol::ScriptId;
use storyline_store::StoreError;
use thiserror::Error;

/// Errors surfaced to callers of the script and auth services.
///
/// A 401 from the gateway never appears here for script operations; it is
/// converted into a local-store fallback.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote call failed for a reason other than 401.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    /// Local persistence failed.
    #[error("local store error: {0}")]
    Store(#[from] StoreError),
    /// Script id is unknown to the local store.
    #[error("script not found: {0}")]
    NotFound(ScriptId),
    /// An operation needs credentials that are not stored.
    #[error("not authenticated: {0}")]
    NotAuthenticated(String),
}
