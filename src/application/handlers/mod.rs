//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod dashboard;
pub mod identity;

pub use account::AccountDataHandler;
pub use dashboard::{DashboardAggregator, DashboardFeed, DashboardSnapshot};
pub use identity::{IdentityReconciler, IdentityState, SessionListener};
