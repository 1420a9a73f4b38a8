//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where local snapshots live on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_identity_file")]
    pub identity_file: String,

    #[serde(default = "default_series_file")]
    pub series_file: String,

    /// Auth session (tokens), so a sign-in survives restarts.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl StorageConfig {
    pub fn identity_path(&self) -> PathBuf {
        self.data_dir.join(&self.identity_file)
    }

    pub fn series_path(&self) -> PathBuf {
        self.data_dir.join(&self.series_file)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_file)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        if self.identity_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__IDENTITY_FILE"));
        }
        if self.series_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__SERIES_FILE"));
        }
        if self.session_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__SESSION_FILE"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            identity_file: default_identity_file(),
            series_file: default_series_file(),
            session_file: default_session_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.attune")
}

fn default_identity_file() -> String {
    "identity.json".to_string()
}

fn default_series_file() -> String {
    "trend.json".to_string()
}

fn default_session_file() -> String {
    "session.json".to_string()
}
