//! Metrics backend adapters.
//!
//! - `http` - REST client for the deployed backend
//! - `mock` - In-memory backend for tests

mod http;
mod mock;

pub use http::{HttpBackendConfig, HttpMetricsBackend};
pub use mock::MockMetricsBackend;
