//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the client core.

mod auth;
mod errors;
mod ids;
mod score;
mod timestamp;

pub use auth::{AuthError, LoginOutcome, RemoteSession, SessionChange};
pub use errors::{BackendError, StorageError, ValidationError};
pub use ids::UserId;
pub use score::{round_half_up, MoodScore};
pub use timestamp::Timestamp;
