//! Application layer - Handlers that coordinate domain and ports.
//!
//! Commands (register, login, mutations) and queries (dashboard) are served
//! by handlers holding `Arc<dyn Port>` dependencies.

pub mod handlers;

pub use handlers::{
    AccountDataHandler, DashboardAggregator, DashboardFeed, DashboardSnapshot,
    IdentityReconciler, IdentityState, SessionListener,
};
