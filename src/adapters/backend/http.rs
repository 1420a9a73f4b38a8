//! HTTP adapter for the `MetricsBackend` port.
//!
//! Every call carries the current session's access token as a bearer token.
//! Requests without a session are still sent; the backend decides whether to
//! reject them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::domain::foundation::{BackendError, UserId};
use crate::ports::{AuthSessionProvider, GuestSession, MetricsBackend, RemoteDashboard};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the metrics backend lives.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// reqwest-based metrics backend client.
pub struct HttpMetricsBackend {
    config: HttpBackendConfig,
    http_client: reqwest::Client,
    auth: Arc<dyn AuthSessionProvider>,
}

impl std::fmt::Debug for HttpMetricsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetricsBackend")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpMetricsBackend {
    pub fn new(
        config: HttpBackendConfig,
        auth: Arc<dyn AuthSessionProvider>,
    ) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            auth,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        // A provider failure only means we go without a token.
        let token = match self.auth.get_session().await {
            Ok(session) => session.and_then(|s| s.access_token),
            Err(e) => {
                tracing::debug!("No session for backend request: {}", e);
                None
            }
        };
        let request = match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {}", e);
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Backend returned error status");
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to parse backend response: {}", e);
            BackendError::data(e.to_string())
        })
    }
}

#[async_trait]
impl MetricsBackend for HttpMetricsBackend {
    async fn fetch_dashboard(&self, user_id: &UserId) -> Result<RemoteDashboard, BackendError> {
        let url = self.config.url(&format!("/api/dashboard/{}", user_id));
        tracing::debug!(%user_id, "Fetching dashboard");
        let response = self.send(self.http_client.get(&url)).await?;
        Self::json(response).await
    }

    async fn create_guest_session(&self) -> Result<GuestSession, BackendError> {
        let url = self.config.url("/api/auth/guest");
        let response = self.send(self.http_client.post(&url)).await?;
        Self::json(response).await
    }

    async fn export_user_data(&self, user_id: &UserId) -> Result<serde_json::Value, BackendError> {
        let url = self.config.url(&format!("/api/user/{}/export", user_id));
        let response = self.send(self.http_client.get(&url)).await?;
        Self::json(response).await
    }

    async fn delete_user_data(&self, user_id: &UserId) -> Result<(), BackendError> {
        let url = self.config.url(&format!("/api/user/{}", user_id));
        self.send(self.http_client.delete(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockAuthSessionProvider;

    #[test]
    fn url_joins_base_and_path() {
        let config = HttpBackendConfig::new("http://localhost:3001/");
        assert_eq!(config.url("/api/auth/guest"), "http://localhost:3001/api/auth/guest");
    }

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        assert_eq!(
            HttpBackendConfig::new("http://x").request_timeout,
            Duration::from_secs(15)
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let backend = HttpMetricsBackend::new(
            HttpBackendConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
            Arc::new(MockAuthSessionProvider::new()),
        )
        .unwrap();

        let result = backend.fetch_dashboard(&UserId::new("u").unwrap()).await;

        assert!(result.unwrap_err().is_transport());
    }
}
