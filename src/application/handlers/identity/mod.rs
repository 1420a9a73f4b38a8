//! Identity handlers.
//!
//! Owns the current user across remote sessions and local snapshots.

mod reconciler;

pub use reconciler::{IdentityReconciler, IdentityState, SessionListener};
