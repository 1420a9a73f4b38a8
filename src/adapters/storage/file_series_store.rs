//! File-based series store.
//!
//! All users' series live in one JSON document mapping user id to points.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;

use super::file_identity_store::write_atomically;
use crate::domain::dashboard::TrendPoint;
use crate::domain::foundation::{MoodScore, StorageError, UserId};
use crate::ports::{upsert_point, LocalSeriesStore};

type SeriesMap = BTreeMap<String, Vec<TrendPoint>>;

/// JSON file holding every user's trend series.
#[derive(Debug)]
pub struct FileSeriesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSeriesStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<SeriesMap, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SeriesMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl LocalSeriesStore for FileSeriesStore {
    fn read_trend(&self, user_id: &UserId) -> Result<Vec<TrendPoint>, StorageError> {
        Ok(self
            .read_all()?
            .remove(user_id.as_str())
            .unwrap_or_default())
    }

    fn save_today_point(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        mood_score: MoodScore,
    ) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Io("series write lock poisoned".to_string()))?;

        // A corrupt file is reported rather than overwritten.
        let mut all = self.read_all()?;
        upsert_point(
            all.entry(user_id.as_str().to_string()).or_default(),
            today,
            mood_score,
        );

        write_atomically(&self.path, &serde_json::to_vec(&all)?)
    }
}
