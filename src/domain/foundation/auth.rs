//! Authentication types for the domain layer.
//!
//! These types describe what the remote session provider tells us about the
//! signed-in principal. They have **no provider dependencies** - Supabase,
//! a mock, or any other GoTrue-compatible service populates them via the
//! `AuthSessionProvider` port.

use secrecy::Secret;
use thiserror::Error;

use super::{Timestamp, UserId};

/// Message fragment the provider uses for bad email/password pairs.
const INVALID_LOGIN_MARKER: &str = "Invalid login";

/// A live session held by the remote auth provider.
///
/// Read-only to this crate. The provider owns its persistence and refresh.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    /// The unique user identifier from the auth provider.
    pub user_id: UserId,

    /// Email, absent for anonymous sessions.
    pub email: Option<String>,

    /// Display name from the user metadata, if any.
    pub display_name: Option<String>,

    /// Whether the session was created through anonymous sign-in.
    pub is_anonymous: bool,

    /// When the remote account was created.
    pub created_at: Timestamp,

    /// Bearer token for calls to the metrics backend.
    pub access_token: Option<Secret<String>>,
}

impl RemoteSession {
    /// Creates a session without an access token.
    pub fn new(user_id: UserId, email: Option<String>, is_anonymous: bool) -> Self {
        Self {
            user_id,
            email,
            display_name: None,
            is_anonymous,
            created_at: Timestamp::now(),
            access_token: None,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }
}

/// A change in the provider's session, pushed to subscribers.
#[derive(Debug, Clone)]
pub enum SessionChange {
    SignedIn(RemoteSession),
    TokenRefreshed(RemoteSession),
    SignedOut,
}

impl SessionChange {
    /// The session after the change, if one is still active.
    pub fn session(&self) -> Option<&RemoteSession> {
        match self {
            SessionChange::SignedIn(s) | SessionChange::TokenRefreshed(s) => Some(s),
            SessionChange::SignedOut => None,
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionChange::SignedIn(_) => "signed_in",
            SessionChange::TokenRefreshed(_) => "token_refreshed",
            SessionChange::SignedOut => "signed_out",
        }
    }
}

/// Result of a password sign-in attempt.
///
/// Expected credential failures are outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Ok,
    NotFound,
    WrongPassword,
}

/// Authentication errors reported by the session provider.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The provider refused the request (duplicate email, weak password,
    /// bad credentials, disabled anonymous sign-in, ...).
    #[error("Auth request rejected: {message}")]
    Rejected { message: String },

    /// The provider could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The provider answered with a payload we cannot interpret.
    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Creates a rejection with the provider's message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the provider rejected an email/password pair.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, AuthError::Rejected { message } if message.contains(INVALID_LOGIN_MARKER))
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn remote_session_builder_sets_fields() {
        let session = RemoteSession::new(test_user_id(), Some("a@b.c".to_string()), false)
            .with_display_name("Alice")
            .with_access_token("tok");

        assert_eq!(session.user_id.as_str(), "user-123");
        assert_eq!(session.display_name.as_deref(), Some("Alice"));
        assert_eq!(
            session.access_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("tok")
        );
    }

    #[test]
    fn remote_session_debug_redacts_token() {
        let session = RemoteSession::new(test_user_id(), None, true).with_access_token("secret-jwt");
        assert!(!format!("{:?}", session).contains("secret-jwt"));
    }

    #[test]
    fn session_change_exposes_session_only_while_signed_in() {
        let session = RemoteSession::new(test_user_id(), None, false);

        assert!(SessionChange::SignedIn(session.clone()).session().is_some());
        assert!(SessionChange::TokenRefreshed(session).session().is_some());
        assert!(SessionChange::SignedOut.session().is_none());
    }

    #[test]
    fn auth_error_detects_invalid_credentials() {
        assert!(AuthError::rejected("Invalid login credentials").is_invalid_credentials());
        assert!(!AuthError::rejected("User not found").is_invalid_credentials());
        assert!(!AuthError::service_unavailable("Invalid login").is_invalid_credentials());
    }

    #[test]
    fn auth_error_is_transient_for_service_errors() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::rejected("nope").is_transient());
    }

    #[test]
    fn auth_error_service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(format!("{}", err), "Auth service unavailable: Connection refused");
    }
}
