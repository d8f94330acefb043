//! Test helpers shared across Storyline crates.

pub mod clock;
pub mod gateway;
pub mod harness;
pub mod jwt;

pub use clock::FixedClock;
pub use gateway::{Failure, RecordingGateway};
pub use harness::{DEFAULT_NOW_MS, Harness};
pub use jwt::{MALFORMED_TOKENS, jwt_with_claims, jwt_with_exp};
