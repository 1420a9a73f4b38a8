//! User module - the logical identity owned by the identity reconciler.
//!
//! # Domain Invariants
//!
//! 1. At most one `User` is materialized at a time
//! 2. A materialized user is always persisted in full
//! 3. `created_at` never changes after construction
//! 4. Progress flags are only ever raised by mutations; they are reset only
//!    when an identity is rebuilt from a remote session

mod background;
mod identity;

pub use background::{Demographics, TodayFeeling, UserBackground, MAX_FEELING_LEVEL};
pub use identity::{User, DEFAULT_USER_NAME, DEMO_GUEST_NAME, OFFLINE_GUEST_NAME};
