//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ATTUNE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use attune_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Auth provider at {}", config.auth.url);
//! ```

mod auth;
mod backend;
mod error;
mod storage;

pub use auth::AuthConfig;
pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Authentication provider (Supabase)
    pub auth: AuthConfig,

    /// Metrics backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Local snapshot files
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tracing filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ATTUNE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ATTUNE__AUTH__URL=https://xyz.supabase.co` -> `auth.url`
    /// - `ATTUNE__BACKEND__BASE_URL=...` -> `backend.base_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ATTUNE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.auth.validate()?;
        self.backend.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ATTUNE__AUTH__URL", "https://xyz.supabase.co");
        env::set_var("ATTUNE__AUTH__ANON_KEY", "anon-key");
    }

    fn clear_env() {
        env::remove_var("ATTUNE__AUTH__URL");
        env::remove_var("ATTUNE__AUTH__ANON_KEY");
        env::remove_var("ATTUNE__BACKEND__BASE_URL");
        env::remove_var("ATTUNE__STORAGE__DATA_DIR");
        env::remove_var("ATTUNE__LOG_LEVEL");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.auth.url, "https://xyz.supabase.co");
        assert_eq!(config.auth.anon_key.expose_secret(), "anon-key");
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.auth.request_timeout_secs, 10);
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.request_timeout_secs, 15);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ATTUNE__BACKEND__BASE_URL", "https://api.attune.app");
        env::set_var("ATTUNE__STORAGE__DATA_DIR", "/var/lib/attune");
        env::set_var("ATTUNE__LOG_LEVEL", "debug");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.backend.base_url, "https://api.attune.app");
        assert_eq!(
            config.storage.identity_path(),
            std::path::PathBuf::from("/var/lib/attune/identity.json")
        );
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_auth_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        assert!(AppConfig::load().is_err());
    }
}
