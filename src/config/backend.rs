//! Metrics backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::{is_http_url, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the metrics backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("BACKEND__BASE_URL"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("BACKEND__REQUEST_TIMEOUT_SECS"));
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    15
}
