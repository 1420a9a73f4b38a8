//! Local series store port - per-user daily mood observations.

use chrono::NaiveDate;

use crate::domain::dashboard::TrendPoint;
use crate::domain::foundation::{MoodScore, StorageError, UserId};

/// Durable append log of daily trend points, keyed by user id.
///
/// Points are kept in chronological order. Existing points are never
/// deleted or reordered; the only in-place change is updating the point for
/// the day being recorded.
pub trait LocalSeriesStore: Send + Sync {
    /// Returns all points for `user_id`, oldest first. Unknown users have an
    /// empty series.
    fn read_trend(&self, user_id: &UserId) -> Result<Vec<TrendPoint>, StorageError>;

    /// Records `mood_score` for `today`, appending a point or updating the
    /// existing one for that date.
    fn save_today_point(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        mood_score: MoodScore,
    ) -> Result<(), StorageError>;
}

/// Inserts or updates the point for `date` in a chronological series.
///
/// An existing point keeps its completion rate; a new one starts at zero.
pub fn upsert_point(points: &mut Vec<TrendPoint>, date: NaiveDate, mood_score: MoodScore) {
    match points.binary_search_by(|p| p.date.cmp(&date)) {
        Ok(index) => points[index].mood_score = mood_score,
        Err(index) => points.insert(index, TrendPoint::new(date, mood_score, 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[test]
    fn upsert_appends_new_day() {
        let mut points = vec![TrendPoint::new(day(1), MoodScore::new(3), 0.5)];

        upsert_point(&mut points, day(2), MoodScore::new(6));

        assert_eq!(points.len(), 2);
        assert_eq!(points[1].date, day(2));
        assert_eq!(points[1].completion_rate, 0.0);
    }

    #[test]
    fn upsert_updates_same_day_and_keeps_completion_rate() {
        let mut points = vec![TrendPoint::new(day(1), MoodScore::new(3), 0.5)];

        upsert_point(&mut points, day(1), MoodScore::new(9));

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].mood_score.value(), 9);
        assert_eq!(points[0].completion_rate, 0.5);
    }

    #[test]
    fn upsert_keeps_chronological_order_for_late_dates() {
        let mut points = vec![
            TrendPoint::new(day(1), MoodScore::new(3), 0.0),
            TrendPoint::new(day(5), MoodScore::new(4), 0.0),
        ];

        upsert_point(&mut points, day(3), MoodScore::new(5));

        let dates: Vec<_> = points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(5)]);
    }
}
