//! Momentum computed from a raw trend series.
//!
//! The backend uses the same formula, so a user moving between online and
//! offline sessions sees continuous scores:
//!
//! - `score = round(mean(mood) * 10)`
//! - `delta = round((mean(recent) - mean(earlier)) * 10)`, where the series is
//!   split at `floor(n / 2)` and the odd point lands in the recent half

use crate::domain::foundation::round_half_up;

use super::{DashboardSource, DashboardView, TrendPoint};

/// Momentum summary of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Momentum {
    /// 0-100.
    pub score: u8,
    pub delta: i64,
}

impl Momentum {
    /// Computes momentum for a chronologically ordered series.
    ///
    /// Returns `None` for an empty series.
    pub fn from_trend(points: &[TrendPoint]) -> Option<Self> {
        let overall = mean_mood(points)?;
        let score = round_half_up(overall * 10.0).clamp(0, 100) as u8;

        let delta = if points.len() < 2 {
            0
        } else {
            let (earlier, recent) = points.split_at(points.len() / 2);
            match (mean_mood(earlier), mean_mood(recent)) {
                (Some(earlier), Some(recent)) => round_half_up((recent - earlier) * 10.0),
                _ => 0,
            }
        };

        Some(Self { score, delta })
    }
}

fn mean_mood(points: &[TrendPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let total: u32 = points.iter().map(|p| u32::from(p.mood_score.value())).sum();
    Some(f64::from(total) / points.len() as f64)
}

impl DashboardView {
    /// Builds the offline view from locally recorded points.
    ///
    /// Agent-derived insights are never fabricated offline: annotations,
    /// hypotheses and feedback stay empty. Returns `None` when there is no
    /// data.
    pub fn from_local_trend(trend: Vec<TrendPoint>) -> Option<Self> {
        let momentum = Momentum::from_trend(&trend)?;
        Some(Self {
            momentum_score: momentum.score,
            momentum_delta: momentum.delta,
            trend,
            annotations: Vec::new(),
            hypotheses: Vec::new(),
            feedback_history: Vec::new(),
            source: DashboardSource::LocalFallback,
        })
    }
}

#[cfg(test)]
#[path = "momentum_test.rs"]
mod momentum_test;
