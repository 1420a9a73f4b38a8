//! Mock metrics backend for testing.
//!
//! # Panics
//!
//! Methods panic if internal locks are poisoned.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::foundation::{BackendError, UserId};
use crate::ports::{GuestSession, MetricsBackend, RemoteDashboard};

/// In-memory backend with per-user dashboards and injectable failures.
#[derive(Debug, Default)]
pub struct MockMetricsBackend {
    dashboards: RwLock<HashMap<UserId, RemoteDashboard>>,
    exports: RwLock<HashMap<UserId, serde_json::Value>>,
    guest: RwLock<Option<GuestSession>>,
    force_error: RwLock<Option<BackendError>>,
    guest_gate: RwLock<Option<Arc<Notify>>>,
    deleted: RwLock<Vec<UserId>>,
    fetch_calls: RwLock<usize>,
}

impl MockMetricsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `dashboard` for `user_id`.
    pub fn with_dashboard(self, user_id: UserId, dashboard: RemoteDashboard) -> Self {
        self.dashboards
            .write()
            .expect("MockMetricsBackend: lock poisoned")
            .insert(user_id, dashboard);
        self
    }

    /// Serves `data` as the export for `user_id`.
    pub fn with_export(self, user_id: UserId, data: serde_json::Value) -> Self {
        self.exports
            .write()
            .expect("MockMetricsBackend: lock poisoned")
            .insert(user_id, data);
        self
    }

    /// Seeds `guest` as the demo identity.
    pub fn with_guest(self, guest: GuestSession) -> Self {
        *self.guest.write().expect("MockMetricsBackend: lock poisoned") = Some(guest);
        self
    }

    /// Makes every call fail with `error`.
    pub fn with_error(self, error: BackendError) -> Self {
        self.set_error(error);
        self
    }

    /// Holds `create_guest_session` until `gate` is notified.
    pub fn with_guest_gate(self, gate: Arc<Notify>) -> Self {
        *self.guest_gate.write().expect("MockMetricsBackend: lock poisoned") = Some(gate);
        self
    }

    pub fn set_error(&self, error: BackendError) {
        *self.force_error.write().expect("MockMetricsBackend: lock poisoned") = Some(error);
    }

    pub fn clear_error(&self) {
        *self.force_error.write().expect("MockMetricsBackend: lock poisoned") = None;
    }

    /// Users whose data was deleted, in call order.
    pub fn deleted(&self) -> Vec<UserId> {
        self.deleted.read().expect("MockMetricsBackend: lock poisoned").clone()
    }

    /// Number of `fetch_dashboard` calls received.
    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.read().expect("MockMetricsBackend: lock poisoned")
    }

    fn check_error(&self) -> Result<(), BackendError> {
        match self
            .force_error
            .read()
            .expect("MockMetricsBackend: lock poisoned")
            .as_ref()
        {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found(user_id: &UserId) -> BackendError {
        BackendError::Status {
            status: 404,
            message: format!("no data for {}", user_id),
        }
    }
}

#[async_trait]
impl MetricsBackend for MockMetricsBackend {
    async fn fetch_dashboard(&self, user_id: &UserId) -> Result<RemoteDashboard, BackendError> {
        *self.fetch_calls.write().expect("MockMetricsBackend: lock poisoned") += 1;
        self.check_error()?;
        self.dashboards
            .read()
            .expect("MockMetricsBackend: lock poisoned")
            .get(user_id)
            .cloned()
            .ok_or_else(|| Self::not_found(user_id))
    }

    async fn create_guest_session(&self) -> Result<GuestSession, BackendError> {
        let gate = self
            .guest_gate
            .read()
            .expect("MockMetricsBackend: lock poisoned")
            .clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.check_error()?;
        self.guest
            .read()
            .expect("MockMetricsBackend: lock poisoned")
            .clone()
            .ok_or_else(|| BackendError::Status {
                status: 503,
                message: "guest seeding unavailable".to_string(),
            })
    }

    async fn export_user_data(&self, user_id: &UserId) -> Result<serde_json::Value, BackendError> {
        self.check_error()?;
        self.exports
            .read()
            .expect("MockMetricsBackend: lock poisoned")
            .get(user_id)
            .cloned()
            .ok_or_else(|| Self::not_found(user_id))
    }

    async fn delete_user_data(&self, user_id: &UserId) -> Result<(), BackendError> {
        self.check_error()?;
        self.dashboards
            .write()
            .expect("MockMetricsBackend: lock poisoned")
            .remove(user_id);
        self.exports
            .write()
            .expect("MockMetricsBackend: lock poisoned")
            .remove(user_id);
        self.deleted
            .write()
            .expect("MockMetricsBackend: lock poisoned")
            .push(user_id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("u-1").unwrap()
    }

    fn dashboard() -> RemoteDashboard {
        serde_json::from_str(r#"{"momentumScore": 50, "momentumDelta": 0}"#).unwrap()
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let backend = MockMetricsBackend::new();
        let err = backend.fetch_dashboard(&user()).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 404, .. }));
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn forced_error_applies_to_every_call() {
        let backend = MockMetricsBackend::new()
            .with_dashboard(user(), dashboard())
            .with_error(BackendError::Transport("down".into()));

        assert!(backend.fetch_dashboard(&user()).await.is_err());
        assert!(backend.delete_user_data(&user()).await.is_err());

        backend.clear_error();
        assert!(backend.fetch_dashboard(&user()).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_data_and_records_call() {
        let backend = MockMetricsBackend::new()
            .with_dashboard(user(), dashboard())
            .with_export(user(), serde_json::json!({"entries": []}));

        backend.delete_user_data(&user()).await.unwrap();

        assert_eq!(backend.deleted(), vec![user()]);
        assert!(backend.export_user_data(&user()).await.is_err());
    }

    #[tokio::test]
    async fn guest_gate_holds_until_notified() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(
            MockMetricsBackend::new()
                .with_guest(GuestSession {
                    user_id: user(),
                    name: "Alex".into(),
                    has_profile: true,
                })
                .with_guest_gate(gate.clone()),
        );

        let task = tokio::spawn({
            let backend = backend.clone();
            async move { backend.create_guest_session().await }
        });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        assert_eq!(task.await.unwrap().unwrap().name, "Alex");
    }
}
