//! Offline-first script services for Storyline.
//!
//! This crate owns the session validity check and the synchronizing facade
//! that decides, per call, between the remote gateway and the local store.

pub mod assistant;
pub mod auth;
pub mod clock;
pub mod error;
pub mod service;
pub mod session;

pub use auth::AuthService;
pub use clock::{Clock, SystemClock};
pub use error::SyncError;
pub use service::ScriptService;
pub use session::{SessionValidator, decode_claims, token_is_live};
