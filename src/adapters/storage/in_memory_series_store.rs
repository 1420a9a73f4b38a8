//! In-Memory Series Store Adapter

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::domain::dashboard::TrendPoint;
use crate::domain::foundation::{MoodScore, StorageError, UserId};
use crate::ports::{upsert_point, LocalSeriesStore};

/// In-memory trend series keyed by user id.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    series: RwLock<HashMap<UserId, Vec<TrendPoint>>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a series for `user_id`, replacing any existing points.
    pub fn with_trend(self, user_id: UserId, points: Vec<TrendPoint>) -> Self {
        if let Ok(mut series) = self.series.write() {
            series.insert(user_id, points);
        }
        self
    }
}

fn poisoned() -> StorageError {
    StorageError::Io("series store lock poisoned".to_string())
}

impl LocalSeriesStore for InMemorySeriesStore {
    fn read_trend(&self, user_id: &UserId) -> Result<Vec<TrendPoint>, StorageError> {
        Ok(self
            .series
            .read()
            .map_err(|_| poisoned())?
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_today_point(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        mood_score: MoodScore,
    ) -> Result<(), StorageError> {
        let mut series = self.series.write().map_err(|_| poisoned())?;
        upsert_point(series.entry(user_id.clone()).or_default(), today, mood_score);
        Ok(())
    }
}
