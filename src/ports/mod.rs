//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Remote Ports
//!
//! - `AuthSessionProvider` - Remote sign-up/sign-in and session changes
//! - `MetricsBackend` - Dashboard aggregates, guest seeding, data export/delete
//!
//! ## Local Ports
//!
//! - `LocalIdentityStore` - Snapshot of the current user
//! - `LocalSeriesStore` - Daily mood points per user

mod auth_session_provider;
mod identity_store;
mod metrics_backend;
mod series_store;

pub use auth_session_provider::{AuthSessionProvider, SessionSubscription};
pub use identity_store::LocalIdentityStore;
pub use metrics_backend::{
    GuestSession, MetricsBackend, RemoteAnnotation, RemoteDashboard, RemoteEvidence,
    RemoteHypothesis, RemoteTrendPoint,
};
pub use series_store::{upsert_point, LocalSeriesStore};
