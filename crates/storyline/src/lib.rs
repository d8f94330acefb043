//! Public SDK surface for Storyline.
//!
//! This crate re-exports the building blocks and wires them together from a
//! [`StorylineConfig`](config::StorylineConfig).

mod client;

pub use client::{Status, Storyline, StorylineError};

/// Re-export for convenience.
pub use storyline_client as gateway;
/// Re-export for convenience.
pub use storyline_config as config;
pub use storyline_core as core;
/// Re-export for convenience.
pub use storyline_protocol as protocol;
pub use storyline_store as store;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
