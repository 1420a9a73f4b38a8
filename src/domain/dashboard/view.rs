use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::MoodScore;

/// One day in the user's trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mood_score: MoodScore,
    /// Share of the day's planned tasks that were completed (0.0 to 1.0).
    #[serde(default)]
    pub completion_rate: f64,
}

impl TrendPoint {
    pub fn new(date: NaiveDate, mood_score: MoodScore, completion_rate: f64) -> Self {
        Self {
            date,
            mood_score,
            completion_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Intervention,
    Pattern,
}

/// Agent note pinned to a day of the trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// ISO date of the annotated trend point, or empty when the backend
    /// referenced a day outside the trend.
    pub date: String,
    pub label: String,
    pub kind: AnnotationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisStatus {
    Testing,
    Confirmed,
    Rejected,
}

/// A behavioural pattern the backend is testing against the user's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypothesis {
    pub id: String,
    pub statement: String,
    pub confidence: Confidence,
    pub status: HypothesisStatus,
    pub evidence: Vec<String>,
}

/// A rating the user gave an intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub date: String,
}

/// Where a dashboard view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSource {
    Remote,
    LocalFallback,
}

/// Unified dashboard for one user. Rebuilt on every aggregation, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// 0-100.
    pub momentum_score: u8,
    pub momentum_delta: i64,
    pub trend: Vec<TrendPoint>,
    pub annotations: Vec<Annotation>,
    pub hypotheses: Vec<Hypothesis>,
    pub feedback_history: Vec<FeedbackItem>,
    pub source: DashboardSource,
}
