//! IdentityReconciler - Single source of truth for "who is the current user".
//!
//! Reconciles three sources that can disagree:
//!
//! - the remote session held by the `AuthSessionProvider`
//! - the local snapshot in the `LocalIdentityStore`
//! - demo data seeded by the `MetricsBackend` for guests
//!
//! The current identity is published on a `watch` channel. Every change to it
//! is persisted to the local store; persistence failures are logged and the
//! in-memory identity stays authoritative.
//!
//! # Stale responses
//!
//! `register`, `login` and `login_as_guest` suspend on remote calls. A
//! generation counter advances on logout and on session loss, and an
//! operation that observes a different generation at commit time discards its
//! result. A cleared identity is never brought back by a late response.
//!
//! Every write to the identity (publish, persist, clear) happens inside the
//! `watch` sender's closure, so the generation check and the write it guards
//! are atomic with respect to a concurrent clear.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::foundation::{
    AuthError, LoginOutcome, SessionChange, StorageError, Timestamp, UserId,
};
use crate::domain::user::{
    Demographics, TodayFeeling, User, UserBackground, DEMO_GUEST_NAME, OFFLINE_GUEST_NAME,
};
use crate::ports::{AuthSessionProvider, LocalIdentityStore, LocalSeriesStore, MetricsBackend};

/// Identity as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityState {
    pub user: Option<User>,
    /// True until the first `restore` completes.
    pub is_loading: bool,
}

/// Keeps the session listener task alive. Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionListener {
    handle: JoinHandle<()>,
}

impl Drop for SessionListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owns the current `User`.
pub struct IdentityReconciler {
    auth: Arc<dyn AuthSessionProvider>,
    backend: Arc<dyn MetricsBackend>,
    identity_store: Arc<dyn LocalIdentityStore>,
    series_store: Arc<dyn LocalSeriesStore>,
    state: watch::Sender<IdentityState>,
    generation: AtomicU64,
}

impl IdentityReconciler {
    pub fn new(
        auth: Arc<dyn AuthSessionProvider>,
        backend: Arc<dyn MetricsBackend>,
        identity_store: Arc<dyn LocalIdentityStore>,
        series_store: Arc<dyn LocalSeriesStore>,
    ) -> Self {
        let (state, _) = watch::channel(IdentityState {
            user: None,
            is_loading: true,
        });

        Self {
            auth,
            backend,
            identity_store,
            series_store,
            state,
            generation: AtomicU64::new(0),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────

    /// Registers an observer. The receiver sees the current state
    /// immediately and every change after it.
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    // ─────────────────────────────────────────────────────────────────────
    // Startup and session tracking
    // ─────────────────────────────────────────────────────────────────────

    /// Reconciles the remote session with the local snapshot.
    ///
    /// - Session and snapshot agree on the id: the snapshot is adopted as is.
    /// - Session present, snapshot absent or for someone else: the identity
    ///   is rebuilt from the session and persisted.
    /// - No session, or the provider failed: the snapshot (if any) is adopted.
    ///
    /// Idempotent.
    pub async fn restore(&self) {
        let generation = self.current_generation();
        let local = self.load_snapshot();

        let session = match self.auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Session lookup failed, using local snapshot: {}", e);
                None
            }
        };

        let (user, rebuilt) = match (session, local) {
            (Some(session), Some(local)) if local.id == session.user_id => (Some(local), false),
            (Some(session), local) => {
                if let Some(local) = local {
                    tracing::info!(
                        local_id = %local.id,
                        session_id = %session.user_id,
                        "Local snapshot belongs to another user; rebuilding from session"
                    );
                }
                (Some(User::from_session(&session)), true)
            }
            (None, local) => (local, false),
        };

        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                tracing::warn!("Session ended during restore; keeping cleared identity");
                return std::mem::replace(&mut state.is_loading, false);
            }
            if let (Some(user), true) = (&user, rebuilt) {
                self.persist(user);
            }

            tracing::debug!(
                user_id = user.as_ref().map(|u| u.id.as_str()),
                "Identity restored"
            );
            state.user = user;
            state.is_loading = false;
            true
        });
    }

    /// Starts following session changes, then restores.
    ///
    /// Subscribing first means a session loss that lands while restore is
    /// running is still applied once restore publishes.
    pub async fn start(self: &Arc<Self>) -> SessionListener {
        let listener = self.spawn_session_listener();
        self.restore().await;
        listener
    }

    /// Follows the provider's session changes until the returned handle is
    /// dropped.
    ///
    /// The task holds only a weak reference, so it never keeps the
    /// reconciler alive.
    pub fn spawn_session_listener(self: &Arc<Self>) -> SessionListener {
        let mut subscription = self.auth.subscribe();
        let reconciler: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            while let Some(change) = subscription.recv().await {
                let Some(reconciler) = reconciler.upgrade() else {
                    break;
                };
                reconciler.handle_session_change(change).await;
            }
            tracing::debug!("Session listener stopped");
        });

        SessionListener { handle }
    }

    /// Applies one session change.
    ///
    /// A change without a session clears the identity, unless the provider
    /// already holds a newer session (the change was overtaken by a sign-in).
    pub async fn handle_session_change(&self, change: SessionChange) {
        tracing::debug!(change = change.kind(), "Session change received");
        if change.session().is_some() {
            return;
        }

        if let Ok(Some(_)) = self.auth.get_session().await {
            tracing::debug!("Sign-out overtaken by a newer session; ignoring");
            return;
        }

        if self.state.borrow().user.is_some() {
            tracing::info!("Remote session lost; clearing identity");
        }
        self.clear_identity();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authentication flows
    // ─────────────────────────────────────────────────────────────────────

    /// Creates a remote account and adopts it. Nothing changes locally when
    /// the provider refuses.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let generation = self.current_generation();
        let user_id = self.auth.sign_up(email, password, name).await?;

        let user = User::registered(user_id, name, email);
        if let Err(e) = self.commit(generation, user) {
            tracing::warn!("Failed to persist registered user: {}", e);
        }
        Ok(())
    }

    /// Signs in with email and password.
    ///
    /// Bad credentials are reported as outcomes; only an unreachable or
    /// misbehaving provider is an error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let generation = self.current_generation();

        match self.auth.sign_in_with_password(email, password).await {
            Ok(session) => {
                if let Err(e) = self.commit(generation, User::returning(&session)) {
                    tracing::warn!("Failed to persist signed-in user: {}", e);
                }
                Ok(LoginOutcome::Ok)
            }
            Err(e) if e.is_invalid_credentials() => Ok(LoginOutcome::WrongPassword),
            Err(AuthError::Rejected { message }) => {
                tracing::debug!(%message, "Sign-in rejected");
                Ok(LoginOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Starts a guest session. Never fails for remote reasons:
    ///
    /// 1. Anonymous sign-in fails: an offline guest with a random id.
    /// 2. Demo seeding succeeds: the seeded identity.
    /// 3. Demo seeding fails: the anonymous id with the demo persona name.
    ///
    /// Returns an error only when the identity could not be persisted.
    pub async fn login_as_guest(&self) -> Result<(), StorageError> {
        let generation = self.current_generation();

        let session = match self.auth.sign_in_anonymously().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Anonymous sign-in failed, continuing offline: {}", e);
                let user = User::guest(UserId::generate(), OFFLINE_GUEST_NAME, false);
                return self.commit(generation, user).map(|_| ());
            }
        };

        let user = match self.backend.create_guest_session().await {
            Ok(seed) => User::guest(seed.user_id, seed.name, seed.has_profile),
            Err(e) => {
                tracing::warn!("Demo seeding failed, using anonymous session: {}", e);
                User::guest(session.user_id, DEMO_GUEST_NAME, false)
            }
        };

        self.commit(generation, user).map(|_| ())
    }

    /// Ends the session. The remote sign-out is best effort; local state is
    /// cleared regardless. Idempotent.
    pub async fn logout(&self) {
        self.advance_generation();

        if let Err(e) = self.auth.sign_out().await {
            tracing::warn!("Remote sign-out failed, clearing locally: {}", e);
        }

        self.clear_identity();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Local mutations (no-ops without a user)
    // ─────────────────────────────────────────────────────────────────────

    pub fn give_consent(&self) {
        self.mutate(|user| {
            user.give_consent();
            true
        });
    }

    pub fn save_background(&self, background: UserBackground) {
        self.mutate(|user| {
            user.set_background(background);
            true
        });
    }

    /// Records today's check-in.
    ///
    /// The feeling is stored on the background only if one exists; today's
    /// trend point is recorded either way.
    pub fn update_today_feeling(&self, feeling: TodayFeeling) {
        let Some(user_id) = self.state.borrow().user.as_ref().map(|u| u.id.clone()) else {
            return;
        };

        let mood_score = feeling.mood_score();
        self.mutate(|user| user.set_today_feeling(feeling));

        if let Err(e) = self
            .series_store
            .save_today_point(&user_id, Timestamp::now().date(), mood_score)
        {
            tracing::warn!(%user_id, "Failed to record trend point: {}", e);
        }
    }

    /// Replaces demographics, keeping today's feeling. Requires a background.
    pub fn update_demographics(&self, demographics: Demographics) {
        self.mutate(|user| user.replace_demographics(demographics));
    }

    pub fn mark_profile_complete(&self) {
        self.mutate(|user| {
            user.mark_profile_complete();
            true
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn advance_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Publishes and persists `user` if no logout or session loss happened
    /// since `generation` was read. Returns false when discarded.
    fn commit(&self, generation: u64, user: User) -> Result<bool, StorageError> {
        let mut outcome = Ok(false);
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                tracing::warn!(user_id = %user.id, "Discarding identity from a superseded session");
                return false;
            }

            outcome = self.identity_store.save(&user).map(|_| true);
            state.user = Some(user);
            state.is_loading = false;
            true
        });
        outcome
    }

    /// Applies `change` to the current user and persists the result if it
    /// reports a modification.
    fn mutate(&self, change: impl FnOnce(&mut User) -> bool) {
        self.state.send_if_modified(|state| {
            let Some(user) = state.user.as_mut() else {
                return false;
            };
            if !change(user) {
                return false;
            }
            self.persist(user);
            true
        });
    }

    fn persist(&self, user: &User) {
        if let Err(e) = self.identity_store.save(user) {
            tracing::warn!(user_id = %user.id, "Failed to persist identity: {}", e);
        }
    }

    fn load_snapshot(&self) -> Option<User> {
        match self.identity_store.load() {
            Ok(user) => user,
            Err(StorageError::Data(reason)) => {
                tracing::warn!(%reason, "Ignoring malformed identity snapshot");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read identity snapshot: {}", e);
                None
            }
        }
    }

    /// Advances the generation and drops the identity in one step, so no
    /// commit that read an older generation can land afterwards.
    fn clear_identity(&self) {
        self.state.send_if_modified(|state| {
            self.advance_generation();
            if let Err(e) = self.identity_store.clear() {
                tracing::warn!("Failed to clear identity snapshot: {}", e);
            }
            state.user.take().is_some()
        });
    }
}

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;
