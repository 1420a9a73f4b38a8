//! Auth session provider port.
//!
//! The remote authentication service that owns sessions. This crate only
//! reads its state and asks it to sign users up, in, or out; refreshing and
//! persisting the session is the provider's job.
//!
//! # Contract
//!
//! Implementations must:
//! - Return `Ok(None)` from `get_session` when nobody is signed in
//! - Return `AuthError::Rejected` with the provider's message for refused
//!   requests (the message is used to classify bad credentials)
//! - Return `AuthError::ServiceUnavailable` when the provider is unreachable
//! - Broadcast a `SessionChange` to every live subscription whenever the
//!   session is created, refreshed, or lost

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, RemoteSession, SessionChange, UserId};

/// Remote authentication and session provider.
#[async_trait]
pub trait AuthSessionProvider: Send + Sync {
    /// Returns the current session, if any.
    async fn get_session(&self) -> Result<Option<RemoteSession>, AuthError>;

    /// Creates a remote account. `name` is stored as user metadata.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<UserId, AuthError>;

    /// Signs in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteSession, AuthError>;

    /// Creates an anonymous session.
    async fn sign_in_anonymously(&self) -> Result<RemoteSession, AuthError>;

    /// Ends the current session remotely.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Registers for session changes. Dropping the returned subscription
    /// unsubscribes.
    fn subscribe(&self) -> SessionSubscription;
}

/// Live registration for session changes.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionChange>,
}

impl SessionSubscription {
    pub fn new(receiver: broadcast::Receiver<SessionChange>) -> Self {
        Self { receiver }
    }

    /// Waits for the next change. Returns `None` once the provider is gone.
    ///
    /// A slow subscriber that falls behind skips the missed changes and
    /// continues with the oldest one still buffered.
    pub async fn recv(&mut self) -> Option<SessionChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
