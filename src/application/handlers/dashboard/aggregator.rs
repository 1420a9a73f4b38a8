//! DashboardAggregator - Query handler producing the unified dashboard.
//!
//! Tries the metrics backend first and maps its payload into a
//! `DashboardView`. Any failure, whether transport or a payload we cannot
//! interpret, discards the remote data entirely and the view is computed from
//! the local trend series instead.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::dashboard::{
    Annotation, AnnotationKind, Confidence, DashboardSource, DashboardView, Hypothesis,
    HypothesisStatus, TrendPoint,
};
use crate::domain::foundation::{BackendError, MoodScore, UserId};
use crate::ports::{
    LocalSeriesStore, MetricsBackend, RemoteAnnotation, RemoteDashboard, RemoteHypothesis,
    RemoteTrendPoint,
};

/// Builds dashboard views with a local fallback.
pub struct DashboardAggregator {
    backend: Arc<dyn MetricsBackend>,
    series_store: Arc<dyn LocalSeriesStore>,
}

impl DashboardAggregator {
    pub fn new(backend: Arc<dyn MetricsBackend>, series_store: Arc<dyn LocalSeriesStore>) -> Self {
        Self {
            backend,
            series_store,
        }
    }

    /// Returns the dashboard for `user_id`, or `None` when neither the
    /// backend nor the local series has anything.
    ///
    /// Never fails: remote errors are logged and trigger the fallback.
    pub async fn get_dashboard(&self, user_id: &UserId) -> Option<DashboardView> {
        match self.fetch_remote(user_id).await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(%user_id, "Dashboard unavailable remotely, using local series: {}", e);
                self.local_view(user_id)
            }
        }
    }

    async fn fetch_remote(&self, user_id: &UserId) -> Result<DashboardView, BackendError> {
        let payload = self.backend.fetch_dashboard(user_id).await?;
        view_from_remote(payload)
    }

    fn local_view(&self, user_id: &UserId) -> Option<DashboardView> {
        let trend = match self.series_store.read_trend(user_id) {
            Ok(trend) => trend,
            Err(e) => {
                tracing::warn!(%user_id, "Failed to read local trend: {}", e);
                return None;
            }
        };
        DashboardView::from_local_trend(trend)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Remote payload mapping
// ════════════════════════════════════════════════════════════════════════════

/// Maps the backend payload. Fails on the first field that does not fit the
/// view, so a partially valid payload is never shown.
pub(crate) fn view_from_remote(payload: RemoteDashboard) -> Result<DashboardView, BackendError> {
    let momentum_score = u8::try_from(payload.momentum_score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| {
            BackendError::data(format!("momentumScore out of range: {}", payload.momentum_score))
        })?;

    let trend = payload
        .trend_data
        .into_iter()
        .map(trend_point)
        .collect::<Result<Vec<_>, _>>()?;

    let annotations = payload
        .agent_annotations
        .into_iter()
        .map(|a| annotation(a, &trend))
        .collect::<Result<Vec<_>, _>>()?;

    let hypotheses = payload
        .hypothesis_cards
        .into_iter()
        .map(hypothesis)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DashboardView {
        momentum_score,
        momentum_delta: payload.momentum_delta,
        trend,
        annotations,
        hypotheses,
        feedback_history: payload.feedback_history,
        source: DashboardSource::Remote,
    })
}

fn trend_point(point: RemoteTrendPoint) -> Result<TrendPoint, BackendError> {
    let date = NaiveDate::parse_from_str(&point.date, "%Y-%m-%d")
        .map_err(|e| BackendError::data(format!("invalid trend date '{}': {}", point.date, e)))?;
    let mood_score = MoodScore::try_new(point.mood_score)?;
    Ok(TrendPoint::new(date, mood_score, point.completion_rate))
}

/// `day_number` is 1-based into the trend. A day outside it keeps the
/// annotation with an empty date.
fn annotation(remote: RemoteAnnotation, trend: &[TrendPoint]) -> Result<Annotation, BackendError> {
    let date = usize::try_from(remote.day_number)
        .ok()
        .and_then(|day| day.checked_sub(1))
        .and_then(|index| trend.get(index))
        .map(|point| point.date.to_string())
        .unwrap_or_default();

    let kind = match remote.kind.as_str() {
        "intervention" => AnnotationKind::Intervention,
        "pattern" => AnnotationKind::Pattern,
        other => return Err(BackendError::data(format!("unknown annotation type '{}'", other))),
    };

    Ok(Annotation {
        date,
        label: remote.text,
        kind,
    })
}

fn hypothesis(remote: RemoteHypothesis) -> Result<Hypothesis, BackendError> {
    let confidence = match remote.confidence.as_str() {
        "high" => Confidence::High,
        "medium" => Confidence::Medium,
        "low" => Confidence::Low,
        other => return Err(BackendError::data(format!("unknown confidence '{}'", other))),
    };
    let status = match remote.status.as_str() {
        "testing" => HypothesisStatus::Testing,
        "confirmed" => HypothesisStatus::Confirmed,
        "rejected" => HypothesisStatus::Rejected,
        other => return Err(BackendError::data(format!("unknown hypothesis status '{}'", other))),
    };

    Ok(Hypothesis {
        id: remote.id,
        statement: remote.pattern_detected,
        confidence,
        status,
        evidence: remote
            .supporting_evidence
            .into_iter()
            .map(|e| e.detail)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockMetricsBackend;
    use crate::adapters::storage::InMemorySeriesStore;
    use serde_json::json;

    fn user() -> UserId {
        UserId::new("u-1").unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn remote(value: serde_json::Value) -> RemoteDashboard {
        serde_json::from_value(value).unwrap()
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "momentumScore": 72,
            "momentumDelta": -3,
            "trendData": [
                { "date": "2026-04-01", "moodScore": 6, "completionRate": 0.5 },
                { "date": "2026-04-02", "moodScore": 8, "completionRate": 1.0 }
            ],
            "agentAnnotations": [
                { "dayNumber": 2, "text": "Walk before work", "type": "intervention" },
                { "dayNumber": 9, "text": "Weekend dip", "type": "pattern" }
            ],
            "hypothesisCards": [{
                "id": "h1",
                "patternDetected": "Sleep drives focus",
                "confidence": "medium",
                "status": "testing",
                "supportingEvidence": [{ "detail": "3 of 4 good nights" }]
            }],
            "feedbackHistory": [
                { "id": "f1", "rating": 4, "feedback": "helped", "date": "2026-04-02" }
            ]
        })
    }

    fn local_trend() -> Vec<TrendPoint> {
        [4, 6, 8, 10]
            .iter()
            .enumerate()
            .map(|(i, s)| TrendPoint::new(day(i as u32 + 1), MoodScore::new(*s), 0.0))
            .collect()
    }

    fn aggregator(backend: MockMetricsBackend, series: InMemorySeriesStore) -> DashboardAggregator {
        DashboardAggregator::new(Arc::new(backend), Arc::new(series))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mapping
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn maps_full_payload() {
        let view = view_from_remote(remote(full_payload())).unwrap();

        assert_eq!(view.momentum_score, 72);
        assert_eq!(view.momentum_delta, -3);
        assert_eq!(view.trend.len(), 2);
        assert_eq!(view.trend[1].mood_score.value(), 8);
        assert_eq!(view.annotations[0].date, "2026-04-02");
        assert_eq!(view.annotations[0].kind, AnnotationKind::Intervention);
        assert_eq!(view.hypotheses[0].statement, "Sleep drives focus");
        assert_eq!(view.hypotheses[0].evidence, vec!["3 of 4 good nights"]);
        assert_eq!(view.feedback_history[0].rating, 4);
        assert_eq!(view.source, DashboardSource::Remote);
    }

    #[test]
    fn annotation_outside_trend_gets_empty_date() {
        let view = view_from_remote(remote(full_payload())).unwrap();
        assert_eq!(view.annotations[1].date, "");
        assert_eq!(view.annotations[1].label, "Weekend dip");
    }

    #[test]
    fn annotation_day_zero_gets_empty_date() {
        let view = view_from_remote(remote(json!({
            "momentumScore": 50,
            "momentumDelta": 0,
            "trendData": [{ "date": "2026-04-01", "moodScore": 5 }],
            "agentAnnotations": [{ "dayNumber": 0, "text": "x", "type": "pattern" }]
        })))
        .unwrap();

        assert_eq!(view.annotations[0].date, "");
    }

    #[test]
    fn missing_lists_map_to_empty() {
        let view =
            view_from_remote(remote(json!({ "momentumScore": 10, "momentumDelta": 1 }))).unwrap();

        assert!(view.trend.is_empty());
        assert!(view.annotations.is_empty());
        assert!(view.hypotheses.is_empty());
        assert!(view.feedback_history.is_empty());
    }

    #[test]
    fn unknown_enum_value_is_data_error() {
        let mut payload = full_payload();
        payload["hypothesisCards"][0]["confidence"] = json!("certain");

        assert!(matches!(
            view_from_remote(remote(payload)),
            Err(BackendError::Data(_))
        ));
    }

    #[test]
    fn bad_trend_date_is_data_error() {
        let mut payload = full_payload();
        payload["trendData"][0]["date"] = json!("April 1st");

        assert!(matches!(
            view_from_remote(remote(payload)),
            Err(BackendError::Data(_))
        ));
    }

    #[test]
    fn out_of_range_scores_are_data_errors() {
        let mut payload = full_payload();
        payload["trendData"][0]["moodScore"] = json!(11);
        assert!(view_from_remote(remote(payload)).is_err());

        let mut payload = full_payload();
        payload["momentumScore"] = json!(101);
        assert!(view_from_remote(remote(payload)).is_err());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fallback
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn remote_success_is_used_as_is() {
        let aggregator = aggregator(
            MockMetricsBackend::new().with_dashboard(user(), remote(full_payload())),
            InMemorySeriesStore::new().with_trend(user(), local_trend()),
        );

        let view = aggregator.get_dashboard(&user()).await.unwrap();

        assert_eq!(view.source, DashboardSource::Remote);
        assert_eq!(view.momentum_score, 72);
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_local_series() {
        let aggregator = aggregator(
            MockMetricsBackend::new().with_error(BackendError::Transport("timeout".into())),
            InMemorySeriesStore::new().with_trend(user(), local_trend()),
        );

        let view = aggregator.get_dashboard(&user()).await.unwrap();

        assert_eq!(view.source, DashboardSource::LocalFallback);
        assert_eq!(view.momentum_score, 70);
        assert_eq!(view.momentum_delta, 40);
        assert!(view.annotations.is_empty());
        assert!(view.hypotheses.is_empty());
        assert!(view.feedback_history.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_discarded_entirely() {
        let mut payload = full_payload();
        payload["agentAnnotations"][0]["type"] = json!("reminder");
        let aggregator = aggregator(
            MockMetricsBackend::new().with_dashboard(user(), remote(payload)),
            InMemorySeriesStore::new().with_trend(user(), local_trend()),
        );

        let view = aggregator.get_dashboard(&user()).await.unwrap();

        assert_eq!(view.source, DashboardSource::LocalFallback);
        assert_eq!(view.trend, local_trend());
    }

    #[tokio::test]
    async fn no_remote_and_no_local_data_is_none() {
        let aggregator = aggregator(
            MockMetricsBackend::new().with_error(BackendError::Transport("down".into())),
            InMemorySeriesStore::new(),
        );

        assert!(aggregator.get_dashboard(&user()).await.is_none());
    }
}
