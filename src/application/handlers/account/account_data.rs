//! AccountDataHandler - Data export and account deletion.

use std::sync::Arc;

use crate::domain::foundation::{BackendError, UserId};
use crate::ports::MetricsBackend;

use super::super::identity::IdentityReconciler;

/// Handler for the user's data rights: export and delete.
pub struct AccountDataHandler {
    backend: Arc<dyn MetricsBackend>,
    identity: Arc<IdentityReconciler>,
}

impl AccountDataHandler {
    pub fn new(backend: Arc<dyn MetricsBackend>, identity: Arc<IdentityReconciler>) -> Self {
        Self { backend, identity }
    }

    /// Everything the backend holds about `user_id`, as opaque JSON.
    pub async fn export(&self, user_id: &UserId) -> Result<serde_json::Value, BackendError> {
        self.backend.export_user_data(user_id).await
    }

    /// Deletes the user's remote data, then logs out.
    ///
    /// On failure the identity is left untouched so the user can retry.
    pub async fn delete(&self, user_id: &UserId) -> Result<(), BackendError> {
        self.backend.delete_user_data(user_id).await.map_err(|e| {
            tracing::error!(%user_id, "Account deletion failed: {}", e);
            e
        })?;

        tracing::info!(%user_id, "Account data deleted");
        self.identity.logout().await;
        Ok(())
    }
}
