//! Supabase (GoTrue) adapter for the `AuthSessionProvider` port.
//!
//! Talks to the GoTrue REST API under `{url}/auth/v1`:
//!
//! | Operation            | Request                                       |
//! |----------------------|-----------------------------------------------|
//! | sign up              | `POST /signup` with email, password, metadata |
//! | anonymous sign-in    | `POST /signup` with an empty body             |
//! | password sign-in     | `POST /token?grant_type=password`             |
//! | refresh              | `POST /token?grant_type=refresh_token`        |
//! | sign out             | `POST /logout` with the bearer token          |
//!
//! Every request carries the project's anon key in the `apikey` header. Each
//! session change is broadcast to subscribers.
//!
//! With a session file configured, the session (including its refresh token)
//! is written there on every change and read back on startup. `get_session`
//! refreshes the access token when it is within a minute of expiring.
//!
//! # Example
//!
//! ```ignore
//! let config = SupabaseConfig::new("https://xyz.supabase.co", Secret::new(key))
//!     .with_session_file("./.attune/session.json");
//! let provider = SupabaseAuthProvider::new(config)?;
//! let session = provider.sign_in_anonymously().await?;
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{broadcast, RwLock};

use crate::adapters::storage::write_atomically;
use crate::domain::foundation::{
    AuthError, RemoteSession, SessionChange, StorageError, Timestamp, UserId,
};
use crate::ports::{AuthSessionProvider, SessionSubscription};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Access tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,

    /// Public anon key sent as `apikey`.
    pub anon_key: Secret<String>,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Where the session is kept between runs. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: Secret<String>) -> Self {
        Self {
            url: url.into(),
            anon_key,
            request_timeout: DEFAULT_TIMEOUT,
            session_file: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url.trim_end_matches('/'), path)
    }
}

/// Session plus the refresh token needed to renew it.
#[derive(Debug)]
struct StoredSession {
    session: RemoteSession,
    refresh_token: Option<Secret<String>>,
    expires_at: Option<Timestamp>,
}

impl StoredSession {
    /// True when the access token expires within the refresh margin and a
    /// refresh token is available to renew it.
    fn needs_refresh(&self, now: Timestamp) -> bool {
        let deadline = Timestamp::from_unix_secs(now.as_unix_secs() + REFRESH_MARGIN_SECS);
        self.refresh_token.is_some()
            && self
                .expires_at
                .map_or(false, |expires_at| expires_at.is_before(&deadline))
    }
}

/// GoTrue-backed session provider.
pub struct SupabaseAuthProvider {
    config: SupabaseConfig,
    http_client: reqwest::Client,
    current: RwLock<Option<StoredSession>>,
    changes: broadcast::Sender<SessionChange>,
}

impl std::fmt::Debug for SupabaseAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseAuthProvider")
            .field("url", &self.config.url)
            .finish_non_exhaustive()
    }
}

impl SupabaseAuthProvider {
    /// Creates a provider, picking up the session saved by a previous run
    /// when a session file is configured.
    pub fn new(config: SupabaseConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                AuthError::service_unavailable(format!("Failed to create HTTP client: {}", e))
            })?;
        let (changes, _) = broadcast::channel(16);
        let current = config.session_file.as_deref().and_then(load_session_file);

        Ok(Self {
            config,
            http_client,
            current: RwLock::new(current),
            changes,
        })
    }

    /// Exchanges the refresh token for a new session.
    ///
    /// Subscribers receive `TokenRefreshed`. A rejected refresh ends the
    /// session and subscribers receive `SignedOut`.
    pub async fn refresh_session(&self) -> Result<Option<RemoteSession>, AuthError> {
        let refresh_token = {
            let current = self.current.read().await;
            match current.as_ref().and_then(|s| s.refresh_token.as_ref()) {
                Some(token) => token.expose_secret().clone(),
                None => return Ok(None),
            }
        };

        let result = self
            .post_token(
                "refresh_token",
                json!({ "refresh_token": refresh_token }),
            )
            .await;

        match result {
            Ok(stored) => {
                let session = stored.session.clone();
                self.store_session(stored, SessionChange::TokenRefreshed).await;
                Ok(Some(session))
            }
            Err(AuthError::Rejected { message }) => {
                tracing::info!(%message, "Session refresh rejected; signing out locally");
                self.clear_session().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn post_token(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<StoredSession, AuthError> {
        let url = format!("{}?grant_type={}", self.config.endpoint("/token"), grant_type);
        let response = self.send(self.http_client.post(&url).json(&body)).await?;
        let token: TokenResponse = parse_body(response).await?;
        token.into_stored()
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AuthError> {
        let response = request
            .header("apikey", self.config.anon_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Auth request failed: {}", e);
                AuthError::service_unavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status.as_u16(), &body))
    }

    async fn store_session(
        &self,
        stored: StoredSession,
        change: fn(RemoteSession) -> SessionChange,
    ) {
        let session = stored.session.clone();
        let mut current = self.current.write().await;
        self.save_session_file(Some(&stored));
        *current = Some(stored);
        drop(current);
        self.notify(change(session));
    }

    async fn clear_session(&self) {
        let mut current = self.current.write().await;
        self.save_session_file(None);
        *current = None;
        drop(current);
        self.notify(SessionChange::SignedOut);
    }

    /// Mirrors the session to disk. Failures only cost persistence across
    /// restarts, so they are logged.
    fn save_session_file(&self, stored: Option<&StoredSession>) {
        let Some(path) = self.config.session_file.as_deref() else {
            return;
        };

        let result = match stored {
            Some(stored) => serde_json::to_vec(&PersistedSession::from(stored))
                .map_err(StorageError::from)
                .and_then(|json| write_atomically(path, &json)),
            None => match fs::remove_file(path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::from(e)),
                _ => Ok(()),
            },
        };

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), "Failed to save auth session: {}", e);
        }
    }

    fn notify(&self, change: SessionChange) {
        tracing::debug!(change = change.kind(), "Auth session changed");
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl AuthSessionProvider for SupabaseAuthProvider {
    async fn get_session(&self) -> Result<Option<RemoteSession>, AuthError> {
        let needs_refresh = match self.current.read().await.as_ref() {
            Some(stored) => stored.needs_refresh(Timestamp::now()),
            None => return Ok(None),
        };

        if needs_refresh {
            match self.refresh_session().await {
                Ok(session) => return Ok(session),
                Err(e) if e.is_transient() => {
                    tracing::warn!("Session refresh failed, keeping current session: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.current.read().await.as_ref().map(|s| s.session.clone()))
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<UserId, AuthError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });
        let response = self
            .send(self.http_client.post(self.config.endpoint("/signup")).json(&body))
            .await?;

        match parse_body::<SignUpResponse>(response).await? {
            SignUpResponse::Session(token) => {
                let stored = token.into_stored()?;
                let user_id = stored.session.user_id.clone();
                self.store_session(stored, SessionChange::SignedIn).await;
                Ok(user_id)
            }
            // Email confirmation pending: an account exists but no session.
            SignUpResponse::User(user) => user.user_id(),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteSession, AuthError> {
        let stored = self
            .post_token("password", json!({ "email": email, "password": password }))
            .await?;
        let session = stored.session.clone();
        self.store_session(stored, SessionChange::SignedIn).await;
        Ok(session)
    }

    async fn sign_in_anonymously(&self) -> Result<RemoteSession, AuthError> {
        let response = self
            .send(
                self.http_client
                    .post(self.config.endpoint("/signup"))
                    .json(&json!({})),
            )
            .await?;
        let stored = parse_body::<TokenResponse>(response).await?.into_stored()?;
        let session = stored.session.clone();
        self.store_session(stored, SessionChange::SignedIn).await;
        Ok(session)
    }

    /// Revokes the session server-side and ends it locally.
    ///
    /// The local session (and its file) is always cleared. When the logout
    /// request cannot be delivered the error is still returned, and the
    /// revoked token stays valid server-side until it expires.
    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = {
            let current = self.current.read().await;
            current
                .as_ref()
                .and_then(|s| s.session.access_token.as_ref())
                .map(|t| t.expose_secret().clone())
        };

        let revoked = match token {
            Some(token) => {
                let request = self
                    .http_client
                    .post(self.config.endpoint("/logout"))
                    .bearer_auth(token);
                match self.send(request).await {
                    Ok(_) => Ok(()),
                    // The session is already gone server-side.
                    Err(AuthError::Rejected { message }) => {
                        tracing::debug!(%message, "Logout rejected; session already ended");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!("Logout request failed; ending local session anyway: {}", e);
                        Err(e)
                    }
                }
            }
            None => Ok(()),
        };

        self.clear_session().await;
        revoked
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.changes.subscribe())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
    /// Absolute expiry in Unix seconds; preferred over `expires_in`.
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

impl TokenResponse {
    fn into_stored(self) -> Result<StoredSession, AuthError> {
        let expires_at = self.expires_at.map(Timestamp::from_unix_secs).or_else(|| {
            self.expires_in
                .map(|secs| Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + secs))
        });
        let mut session = self.user.into_session()?;
        session.access_token = Some(Secret::new(self.access_token));
        Ok(StoredSession {
            session,
            refresh_token: self.refresh_token.map(Secret::new),
            expires_at,
        })
    }
}

/// On-disk form of a `StoredSession`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    user_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    is_anonymous: bool,
    created_at: Timestamp,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    expires_at: Option<i64>,
}

impl From<&StoredSession> for PersistedSession {
    fn from(stored: &StoredSession) -> Self {
        let session = &stored.session;
        Self {
            user_id: session.user_id.as_str().to_string(),
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            is_anonymous: session.is_anonymous,
            created_at: session.created_at,
            access_token: session
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().clone()),
            refresh_token: stored
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().clone()),
            expires_at: stored.expires_at.map(|t| t.as_unix_secs()),
        }
    }
}

impl PersistedSession {
    fn into_stored(self) -> Result<StoredSession, AuthError> {
        let user_id = UserId::new(&self.user_id)
            .map_err(|_| AuthError::InvalidResponse("user id is empty".to_string()))?;
        let mut session = RemoteSession::new(user_id, self.email, self.is_anonymous)
            .with_created_at(self.created_at);
        session.display_name = self.display_name;
        session.access_token = self.access_token.map(Secret::new);

        Ok(StoredSession {
            session,
            refresh_token: self.refresh_token.map(Secret::new),
            expires_at: self.expires_at.map(Timestamp::from_unix_secs),
        })
    }
}

/// Reads the session saved by a previous run. A missing or unreadable file
/// means no session.
fn load_session_file(path: &Path) -> Option<StoredSession> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to read auth session: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<PersistedSession>(&json)
        .map_err(|e| AuthError::InvalidResponse(e.to_string()))
        .and_then(PersistedSession::into_stored)
    {
        Ok(stored) => {
            tracing::debug!(user_id = %stored.session.user_id, "Auth session restored from disk");
            Some(stored)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Ignoring malformed auth session: {}", e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_anonymous: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

impl GoTrueUser {
    fn user_id(&self) -> Result<UserId, AuthError> {
        UserId::new(&self.id)
            .map_err(|_| AuthError::InvalidResponse("user id is empty".to_string()))
    }

    fn into_session(self) -> Result<RemoteSession, AuthError> {
        let user_id = self.user_id()?;
        // GoTrue reports an empty string rather than null for anonymous users.
        let email = self.email.filter(|e| !e.is_empty());
        let mut session = RemoteSession::new(user_id, email, self.is_anonymous);
        if let Some(name) = self.user_metadata.name.filter(|n| !n.is_empty()) {
            session = session.with_display_name(name);
        }
        if let Some(created_at) = self.created_at {
            session = session.with_created_at(Timestamp::from_datetime(created_at));
        }
        Ok(session)
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(GoTrueUser),
}

/// GoTrue has used several error shapes over time.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

async fn parse_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AuthError> {
    response.json::<T>().await.map_err(|e| {
        tracing::error!("Failed to parse auth response: {}", e);
        AuthError::InvalidResponse(e.to_string())
    })
}

/// Maps a non-success response to an error.
///
/// Client errors are rejections carrying the provider's message; anything
/// else means the service is unhealthy.
fn error_from_status(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("HTTP {}", status));

    if (400..500).contains(&status) && status != 408 && status != 429 {
        AuthError::rejected(message)
    } else {
        AuthError::service_unavailable(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = SupabaseConfig::new("https://xyz.supabase.co/", Secret::new("k".into()));
        assert_eq!(config.endpoint("/signup"), "https://xyz.supabase.co/auth/v1/signup");
    }

    #[test]
    fn config_defaults_to_ten_second_timeout() {
        let config = SupabaseConfig::new("https://x", Secret::new("k".into()));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn token_response_maps_user_fields() {
        let json = r#"{
            "access_token": "jwt",
            "refresh_token": "r1",
            "token_type": "bearer",
            "user": {
                "id": "user-1",
                "email": "kim@example.com",
                "is_anonymous": false,
                "created_at": "2026-03-01T12:00:00Z",
                "user_metadata": { "name": "Kim" }
            }
        }"#;

        let stored = serde_json::from_str::<TokenResponse>(json)
            .unwrap()
            .into_stored()
            .unwrap();

        assert_eq!(stored.session.user_id.as_str(), "user-1");
        assert_eq!(stored.session.display_name.as_deref(), Some("Kim"));
        assert_eq!(stored.session.email.as_deref(), Some("kim@example.com"));
        assert_eq!(
            stored.session.created_at.as_datetime().to_rfc3339(),
            "2026-03-01T12:00:00+00:00"
        );
        assert!(stored.refresh_token.is_some());
    }

    #[test]
    fn anonymous_user_has_no_email_or_name() {
        let json = r#"{
            "access_token": "jwt",
            "user": { "id": "anon-1", "email": "", "is_anonymous": true, "user_metadata": {} }
        }"#;

        let stored = serde_json::from_str::<TokenResponse>(json)
            .unwrap()
            .into_stored()
            .unwrap();

        assert!(stored.session.is_anonymous);
        assert!(stored.session.email.is_none());
        assert!(stored.session.display_name.is_none());
    }

    #[test]
    fn sign_up_without_confirmation_returns_bare_user() {
        let json = r#"{ "id": "user-2", "email": "a@b.c" }"#;

        match serde_json::from_str::<SignUpResponse>(json).unwrap() {
            SignUpResponse::User(user) => assert_eq!(user.user_id().unwrap().as_str(), "user-2"),
            SignUpResponse::Session(_) => panic!("expected bare user"),
        }
    }

    #[test]
    fn bad_credentials_become_rejection_with_provider_message() {
        let error = error_from_status(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert!(error.is_invalid_credentials());
    }

    #[test]
    fn msg_field_is_preferred() {
        let error = error_from_status(422, r#"{"code":422,"msg":"User already registered"}"#);
        assert!(matches!(error, AuthError::Rejected { message } if message == "User already registered"));
    }

    #[test]
    fn server_errors_are_service_unavailable() {
        assert!(error_from_status(503, "").is_transient());
        assert!(error_from_status(429, "{}").is_transient());
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let error = error_from_status(401, "<html>");
        assert!(matches!(error, AuthError::Rejected { message } if message == "HTTP 401"));
    }

    #[tokio::test]
    async fn new_provider_has_no_session() {
        let provider =
            SupabaseAuthProvider::new(SupabaseConfig::new("http://localhost:1", Secret::new("k".into())))
                .unwrap();
        assert!(provider.get_session().await.unwrap().is_none());
        assert!(provider.refresh_session().await.unwrap().is_none());
    }

    fn provider_with_file(path: &Path) -> SupabaseAuthProvider {
        // Nothing listens on port 1, so every request fails to connect.
        SupabaseAuthProvider::new(
            SupabaseConfig::new("http://127.0.0.1:1", Secret::new("k".into()))
                .with_session_file(path),
        )
        .unwrap()
    }

    fn write_session(path: &Path, expires_at: i64, refresh_token: Option<&str>) {
        let record = json!({
            "user_id": "user-7",
            "email": "kim@example.com",
            "display_name": "Kim",
            "is_anonymous": false,
            "created_at": "2026-03-01T12:00:00Z",
            "access_token": "jwt-7",
            "refresh_token": refresh_token,
            "expires_at": expires_at,
        });
        fs::write(path, record.to_string()).unwrap();
    }

    fn in_an_hour() -> i64 {
        Timestamp::now().as_unix_secs() + 3600
    }

    #[test]
    fn token_response_expiry_prefers_absolute_time() {
        let json = r#"{
            "access_token": "jwt",
            "expires_in": 3600,
            "expires_at": 1800000000,
            "user": { "id": "user-1" }
        }"#;

        let stored = serde_json::from_str::<TokenResponse>(json)
            .unwrap()
            .into_stored()
            .unwrap();

        assert_eq!(stored.expires_at.map(|t| t.as_unix_secs()), Some(1_800_000_000));
    }

    #[test]
    fn token_response_expiry_from_lifetime() {
        let json = r#"{ "access_token": "jwt", "expires_in": 3600, "user": { "id": "user-1" } }"#;
        let before = Timestamp::now().as_unix_secs();

        let stored = serde_json::from_str::<TokenResponse>(json)
            .unwrap()
            .into_stored()
            .unwrap();

        let expires_at = stored.expires_at.unwrap().as_unix_secs();
        assert!(expires_at >= before + 3600 && expires_at <= before + 3605);
    }

    #[test]
    fn refresh_needed_only_near_expiry_with_refresh_token() {
        let now = Timestamp::now();
        let session = RemoteSession::new(UserId::new("u").unwrap(), None, true);
        let stored = |secs_left: i64, refresh: bool| StoredSession {
            session: session.clone(),
            refresh_token: refresh.then(|| Secret::new("r".to_string())),
            expires_at: Some(Timestamp::from_unix_secs(now.as_unix_secs() + secs_left)),
        };

        assert!(stored(30, true).needs_refresh(now));
        assert!(stored(-10, true).needs_refresh(now));
        assert!(!stored(3600, true).needs_refresh(now));
        assert!(!stored(30, false).needs_refresh(now));
    }

    #[tokio::test]
    async fn saved_session_is_picked_up_on_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        write_session(&path, in_an_hour(), Some("r1"));

        let session = provider_with_file(&path).get_session().await.unwrap().unwrap();

        assert_eq!(session.user_id.as_str(), "user-7");
        assert_eq!(session.display_name.as_deref(), Some("Kim"));
        assert_eq!(
            session.access_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("jwt-7")
        );
    }

    #[tokio::test]
    async fn malformed_session_file_means_no_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        assert!(provider_with_file(&path).get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_token_is_kept_while_refresh_is_unreachable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        write_session(&path, Timestamp::now().as_unix_secs() - 10, Some("r1"));

        let session = provider_with_file(&path).get_session().await.unwrap();

        assert_eq!(session.map(|s| s.user_id.as_str().to_string()).as_deref(), Some("user-7"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unreachable_logout_still_ends_local_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        write_session(&path, in_an_hour(), Some("r1"));
        let provider = provider_with_file(&path);
        let mut subscription = provider.subscribe();

        let result = provider.sign_out().await;

        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
        assert!(provider.get_session().await.unwrap().is_none());
        assert!(!path.exists());
        assert!(matches!(subscription.recv().await, Some(SessionChange::SignedOut)));

        // A restart finds nothing to restore.
        assert!(provider_with_file(&path).get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_out_without_session_notifies_signed_out() {
        let provider =
            SupabaseAuthProvider::new(SupabaseConfig::new("http://localhost:1", Secret::new("k".into())))
                .unwrap();
        let mut subscription = provider.subscribe();

        provider.sign_out().await.unwrap();

        assert!(matches!(subscription.recv().await, Some(SessionChange::SignedOut)));
    }
}
