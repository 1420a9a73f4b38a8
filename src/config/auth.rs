//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::{is_http_url, ValidationError};

/// Authentication configuration (Supabase project)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Public anon key
    pub anon_key: Secret<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__URL"));
        }
        if !is_http_url(&self.url) {
            return Err(ValidationError::InvalidUrl("AUTH__URL"));
        }
        if self.anon_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ANON_KEY"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("AUTH__REQUEST_TIMEOUT_SECS"));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}
