//! Mock auth session provider for testing.
//!
//! Implements the `AuthSessionProvider` port entirely in memory, so the
//! reconciler can be exercised without a live provider.
//!
//! # Panics
//!
//! Methods panic if internal locks are poisoned. This adapter is for tests
//! and demos only.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAuthSessionProvider::new()
//!     .with_account("sam@example.com", "hunter22", "Sam")
//!     .with_sign_out_error(AuthError::service_unavailable("offline"));
//!
//! let session = provider.sign_in_with_password("sam@example.com", "hunter22").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, RemoteSession, SessionChange, UserId};
use crate::ports::{AuthSessionProvider, SessionSubscription};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    name: String,
}

/// Operations whose failure can be forced.
#[derive(Debug, Default)]
struct ForcedErrors {
    get_session: Option<AuthError>,
    sign_up: Option<AuthError>,
    sign_in: Option<AuthError>,
    anonymous: Option<AuthError>,
    sign_out: Option<AuthError>,
}

/// In-memory auth provider.
///
/// Accounts are keyed by lowercased email. Every session change is broadcast
/// to subscribers, as a real provider would.
#[derive(Debug)]
pub struct MockAuthSessionProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<RemoteSession>>,
    errors: RwLock<ForcedErrors>,
    sign_out_calls: RwLock<usize>,
    changes: broadcast::Sender<SessionChange>,
}

impl Default for MockAuthSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthSessionProvider {
    /// Creates a provider with no accounts and no session.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            errors: RwLock::new(ForcedErrors::default()),
            sign_out_calls: RwLock::new(0),
            changes,
        }
    }

    /// Registers an account that can sign in with `password`.
    pub fn with_account(self, email: &str, password: &str, name: &str) -> Self {
        let account = Account {
            user_id: UserId::generate(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.accounts
            .write()
            .expect("MockAuthSessionProvider: accounts lock poisoned")
            .insert(email.to_lowercase(), account);
        self
    }

    /// Starts with an active session.
    pub fn with_session(self, session: RemoteSession) -> Self {
        *self
            .session
            .write()
            .expect("MockAuthSessionProvider: session lock poisoned") = Some(session);
        self
    }

    /// Forces `get_session` to fail.
    pub fn with_get_session_error(self, error: AuthError) -> Self {
        self.errors_mut().get_session = Some(error);
        self
    }

    /// Forces `sign_up` to fail.
    pub fn with_sign_up_error(self, error: AuthError) -> Self {
        self.errors_mut().sign_up = Some(error);
        self
    }

    /// Forces `sign_in_with_password` to fail.
    pub fn with_sign_in_error(self, error: AuthError) -> Self {
        self.errors_mut().sign_in = Some(error);
        self
    }

    /// Forces `sign_in_anonymously` to fail.
    pub fn with_anonymous_error(self, error: AuthError) -> Self {
        self.errors_mut().anonymous = Some(error);
        self
    }

    /// Forces `sign_out` to fail. The local session is still ended, as when
    /// the provider cannot be reached to revoke it.
    pub fn with_sign_out_error(self, error: AuthError) -> Self {
        self.errors_mut().sign_out = Some(error);
        self
    }

    /// Clears every forced error.
    pub fn clear_errors(&self) {
        *self.errors_mut() = ForcedErrors::default();
    }

    /// Simulates the session ending elsewhere (expiry, sign-out on another
    /// device) and notifies subscribers.
    pub fn expire_session(&self) {
        self.set_session(None);
    }

    /// Number of `sign_out` calls received.
    pub fn sign_out_calls(&self) -> usize {
        *self
            .sign_out_calls
            .read()
            .expect("MockAuthSessionProvider: counter lock poisoned")
    }

    /// Current session without going through the port.
    pub fn current_session(&self) -> Option<RemoteSession> {
        self.session
            .read()
            .expect("MockAuthSessionProvider: session lock poisoned")
            .clone()
    }

    fn errors_mut(&self) -> std::sync::RwLockWriteGuard<'_, ForcedErrors> {
        self.errors
            .write()
            .expect("MockAuthSessionProvider: errors lock poisoned")
    }

    fn forced(&self, pick: impl Fn(&ForcedErrors) -> &Option<AuthError>) -> Result<(), AuthError> {
        let errors = self
            .errors
            .read()
            .expect("MockAuthSessionProvider: errors lock poisoned");
        match pick(&errors) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn set_session(&self, session: Option<RemoteSession>) {
        *self
            .session
            .write()
            .expect("MockAuthSessionProvider: session lock poisoned") = session.clone();

        let change = match session {
            Some(session) => SessionChange::SignedIn(session),
            None => SessionChange::SignedOut,
        };
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl AuthSessionProvider for MockAuthSessionProvider {
    async fn get_session(&self) -> Result<Option<RemoteSession>, AuthError> {
        self.forced(|e| &e.get_session)?;
        Ok(self.current_session())
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<UserId, AuthError> {
        self.forced(|e| &e.sign_up)?;

        let key = email.to_lowercase();
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::rejected(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let account = {
            let mut accounts = self
                .accounts
                .write()
                .expect("MockAuthSessionProvider: accounts lock poisoned");
            if accounts.contains_key(&key) {
                return Err(AuthError::rejected("User already registered"));
            }
            let account = Account {
                user_id: UserId::generate(),
                password: password.to_string(),
                name: name.to_string(),
            };
            accounts.insert(key.clone(), account.clone());
            account
        };

        self.set_session(Some(
            RemoteSession::new(account.user_id.clone(), Some(key), false)
                .with_display_name(account.name)
                .with_access_token(format!("mock-token-{}", account.user_id)),
        ));
        Ok(account.user_id)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteSession, AuthError> {
        self.forced(|e| &e.sign_in)?;

        let key = email.to_lowercase();
        let account = self
            .accounts
            .read()
            .expect("MockAuthSessionProvider: accounts lock poisoned")
            .get(&key)
            .cloned()
            .ok_or_else(|| AuthError::rejected("User not found"))?;

        if account.password != password {
            return Err(AuthError::rejected("Invalid login credentials"));
        }

        let session = RemoteSession::new(account.user_id.clone(), Some(key), false)
            .with_display_name(account.name)
            .with_access_token(format!("mock-token-{}", account.user_id));
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in_anonymously(&self) -> Result<RemoteSession, AuthError> {
        self.forced(|e| &e.anonymous)?;

        let user_id = UserId::generate();
        let session = RemoteSession::new(user_id.clone(), None, true)
            .with_access_token(format!("mock-token-{}", user_id));
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self
            .sign_out_calls
            .write()
            .expect("MockAuthSessionProvider: counter lock poisoned") += 1;
        let forced = self.forced(|e| &e.sign_out);

        self.set_session(None);
        forced
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.changes.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_without_session() {
        let provider = MockAuthSessionProvider::new();
        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_up_creates_session_with_metadata_name() {
        let provider = MockAuthSessionProvider::new();

        let user_id = provider
            .sign_up("Kim@Example.com", "long-enough", "Kim")
            .await
            .unwrap();

        let session = provider.get_session().await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.display_name.as_deref(), Some("Kim"));
        assert_eq!(session.email.as_deref(), Some("kim@example.com"));
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicates_and_weak_passwords() {
        let provider = MockAuthSessionProvider::new().with_account("a@b.c", "secret1", "A");

        assert!(matches!(
            provider.sign_up("a@b.c", "secret2", "A").await,
            Err(AuthError::Rejected { .. })
        ));
        assert!(matches!(
            provider.sign_up("new@b.c", "123", "N").await,
            Err(AuthError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn sign_in_distinguishes_wrong_password_from_unknown_user() {
        let provider = MockAuthSessionProvider::new().with_account("a@b.c", "secret1", "A");

        let wrong = provider.sign_in_with_password("a@b.c", "nope").await.unwrap_err();
        let unknown = provider.sign_in_with_password("x@b.c", "nope").await.unwrap_err();

        assert!(wrong.is_invalid_credentials());
        assert!(!unknown.is_invalid_credentials());
    }

    #[tokio::test]
    async fn anonymous_sign_in_marks_session_anonymous() {
        let provider = MockAuthSessionProvider::new();
        let session = provider.sign_in_anonymously().await.unwrap();

        assert!(session.is_anonymous);
        assert!(session.email.is_none());
    }

    #[tokio::test]
    async fn expire_session_notifies_subscribers() {
        let provider = MockAuthSessionProvider::new()
            .with_session(RemoteSession::new(UserId::new("u").unwrap(), None, false));
        let mut subscription = provider.subscribe();

        provider.expire_session();

        let change = subscription.recv().await.unwrap();
        assert!(change.session().is_none());
        assert!(provider.current_session().is_none());
    }

    #[tokio::test]
    async fn forced_sign_out_error_still_ends_local_session() {
        let provider = MockAuthSessionProvider::new()
            .with_session(RemoteSession::new(UserId::new("u").unwrap(), None, false))
            .with_sign_out_error(AuthError::service_unavailable("offline"));

        assert!(provider.sign_out().await.is_err());
        assert_eq!(provider.sign_out_calls(), 1);
        assert!(provider.current_session().is_none());

        provider.clear_errors();
        assert!(provider.sign_out().await.is_ok());
        assert_eq!(provider.sign_out_calls(), 2);
    }
}
