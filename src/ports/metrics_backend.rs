//! Metrics backend port.
//!
//! The remote service that owns analytics and demo data. Only its observable
//! contract is modelled here: the raw payload types below mirror the JSON it
//! returns, and mapping them into domain views is the caller's job.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::dashboard::FeedbackItem;
use crate::domain::foundation::{BackendError, UserId};

/// Remote metrics and data backend.
///
/// # Contract
///
/// - `BackendError::Transport` when the backend cannot be reached
/// - `BackendError::Status` for non-success responses
/// - `BackendError::Data` when the body does not match the payload types
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Fetches the raw dashboard aggregates for a user.
    async fn fetch_dashboard(&self, user_id: &UserId) -> Result<RemoteDashboard, BackendError>;

    /// Seeds demo content for the caller's anonymous session.
    async fn create_guest_session(&self) -> Result<GuestSession, BackendError>;

    /// Exports everything the backend holds about a user.
    async fn export_user_data(&self, user_id: &UserId) -> Result<serde_json::Value, BackendError>;

    /// Deletes everything the backend holds about a user.
    async fn delete_user_data(&self, user_id: &UserId) -> Result<(), BackendError>;
}

/// Dashboard payload as returned by the backend.
///
/// The scores are required; every list defaults to empty when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDashboard {
    pub momentum_score: i64,
    pub momentum_delta: i64,
    #[serde(default)]
    pub trend_data: Vec<RemoteTrendPoint>,
    #[serde(default)]
    pub agent_annotations: Vec<RemoteAnnotation>,
    #[serde(default)]
    pub hypothesis_cards: Vec<RemoteHypothesis>,
    #[serde(default)]
    pub feedback_history: Vec<FeedbackItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTrendPoint {
    pub date: String,
    pub mood_score: i64,
    #[serde(default)]
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnnotation {
    /// 1-based index into `trend_data`.
    pub day_number: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteHypothesis {
    pub id: String,
    pub pattern_detected: String,
    pub confidence: String,
    pub status: String,
    #[serde(default)]
    pub supporting_evidence: Vec<RemoteEvidence>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteEvidence {
    pub detail: String,
}

/// Demo identity the backend seeded for an anonymous session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSession {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub has_profile: bool,
}
