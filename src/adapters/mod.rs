//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session providers (Supabase, mock)
//! - `backend` - Metrics backend clients (HTTP, mock)
//! - `storage` - Local identity and series stores (file, in-memory)

pub mod auth;
pub mod backend;
pub mod storage;

pub use auth::{MockAuthSessionProvider, SupabaseAuthProvider, SupabaseConfig};
pub use backend::{HttpBackendConfig, HttpMetricsBackend, MockMetricsBackend};
pub use storage::{FileIdentityStore, FileSeriesStore, InMemoryIdentityStore, InMemorySeriesStore};
