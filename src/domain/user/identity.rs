//! The logical user identity exposed to the view layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RemoteSession, Timestamp, UserId};

use super::{Demographics, TodayFeeling, UserBackground};

/// Name used when the remote account carries no display name.
pub const DEFAULT_USER_NAME: &str = "User";

/// Name given to a guest created without any backend.
pub const OFFLINE_GUEST_NAME: &str = "Guest";

/// Name of the seeded demo persona a guest receives.
pub const DEMO_GUEST_NAME: &str = "Alex";

/// The current user and their onboarding progress.
///
/// Serialized in camelCase so the persisted snapshot matches the browser
/// client's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub is_guest: bool,
    pub has_consented: bool,
    pub has_background: bool,
    pub has_profile: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<UserBackground>,

    created_at: Timestamp,
}

impl User {
    /// A freshly registered account. Email is stored lowercased.
    pub fn registered(id: UserId, name: impl Into<String>, email: &str) -> Self {
        Self {
            id,
            name: name.into(),
            email: Some(email.to_lowercase()),
            is_guest: false,
            has_consented: false,
            has_background: false,
            has_profile: false,
            background: None,
            created_at: Timestamp::now(),
        }
    }

    /// Rebuilds an identity from a remote session, with all progress reset.
    pub fn from_session(session: &RemoteSession) -> Self {
        Self {
            id: session.user_id.clone(),
            name: session
                .display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            email: session.email.clone(),
            is_guest: session.is_anonymous,
            has_consented: false,
            has_background: false,
            has_profile: false,
            background: None,
            created_at: session.created_at,
        }
    }

    /// A returning account after password sign-in. Consent was given on a
    /// previous visit, so it is not asked again.
    pub fn returning(session: &RemoteSession) -> Self {
        Self {
            is_guest: false,
            has_consented: true,
            ..Self::from_session(session)
        }
    }

    /// A guest identity.
    pub fn guest(id: UserId, name: impl Into<String>, has_profile: bool) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            is_guest: true,
            has_consented: false,
            has_background: false,
            has_profile,
            background: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn give_consent(&mut self) {
        self.has_consented = true;
    }

    pub fn set_background(&mut self, background: UserBackground) {
        self.has_background = true;
        self.background = Some(background);
    }

    /// Replaces today's feeling inside the background.
    ///
    /// Without a background there is nowhere to put it and nothing changes.
    pub fn set_today_feeling(&mut self, feeling: TodayFeeling) -> bool {
        match self.background.as_mut() {
            Some(background) => {
                background.today_feeling = Some(feeling);
                true
            }
            None => false,
        }
    }

    /// Replaces the demographic fields, keeping today's feeling.
    ///
    /// Returns false and leaves the user untouched when no background exists;
    /// a background must be saved first.
    pub fn replace_demographics(&mut self, demographics: Demographics) -> bool {
        match self.background.as_mut() {
            Some(background) => {
                background.demographics = demographics;
                true
            }
            None => false,
        }
    }

    pub fn mark_profile_complete(&mut self) {
        self.has_profile = true;
    }
}
