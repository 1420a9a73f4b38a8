//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Invalid request timeout for {0}")]
    InvalidTimeout(&'static str),
}

/// Returns true for absolute http(s) URLs with a host part.
pub(super) fn is_http_url(url: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_http_url("http://localhost:8000"));
        assert!(is_http_url("https://xyz.supabase.co"));
    }

    #[test]
    fn rejects_other_schemes_and_bare_scheme() {
        assert!(!is_http_url("ftp://host"));
        assert!(!is_http_url("xyz.supabase.co"));
        assert!(!is_http_url("https://"));
    }
}
