//! In-memory reflection of "who is signed in on this session and what is
//! their profile", fed by the auth event stream.
//!
//! One entry per live session. An entry without a resolved profile is in the
//! `Loading` phase, one with a resolved profile slot is `Ready`; sessions the
//! store does not know about read as `Unauthenticated`. Entries carry their
//! refresh expiry so abandoned sessions can be swept.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::app_error::AppResult;
use crate::application::dto::id::IdDTO;
use crate::application::dto::profile::{ProfileDTO, ProfileLoad};
use crate::application::interactors::profile::LoadProfileInteractor;
use crate::application::interface::events::AuthEvent;
use crate::domain::entities::{auth_session::AuthSession, id::Id, identity::Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Loading,
    Ready,
}

/// Result of resolving the profile of a signed-in session. "There is no
/// profile" and "the profile could not be fetched" stay distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSlot {
    Loaded(ProfileDTO),
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub identity_id: Id<Identity>,
    /// Unknown for sessions restored without a sign-in until the profile loads.
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<CurrentUser>,
    pub profile: Option<ProfileSlot>,
}

impl SessionSnapshot {
    pub fn unauthenticated() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            user: None,
            profile: None,
        }
    }

    pub fn loading(user: CurrentUser) -> Self {
        Self {
            phase: SessionPhase::Loading,
            user: Some(user),
            profile: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    user: CurrentUser,
    profile: Option<ProfileSlot>,
    refresh_expires_at: DateTime<Utc>,
}

impl Entry {
    fn snapshot(&self) -> SessionSnapshot {
        let phase = match self.profile {
            Some(_) => SessionPhase::Ready,
            None => SessionPhase::Loading,
        };
        SessionSnapshot {
            phase,
            user: Some(self.user.clone()),
            profile: self.profile.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<Id<AuthSession>, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self, session_id: &Id<AuthSession>) -> SessionSnapshot {
        self.entries
            .read()
            .await
            .get(session_id)
            .map(Entry::snapshot)
            .unwrap_or_else(SessionSnapshot::unauthenticated)
    }

    /// Moves the session into `Loading`. A repeated sign-in for a tracked
    /// session restarts its profile resolution.
    pub async fn begin(&self, session_id: Id<AuthSession>, user: CurrentUser, refresh_expires_at: DateTime<Utc>) {
        self.entries.write().await.insert(
            session_id,
            Entry {
                user,
                profile: None,
                refresh_expires_at,
            },
        );
    }

    /// Stores the outcome of a profile load. Dropped if the session was signed
    /// out while the load was in flight.
    pub async fn resolve(&self, session_id: &Id<AuthSession>, outcome: AppResult<ProfileLoad>) {
        let slot = match outcome {
            Ok(load) => match load.into_profile() {
                Some(profile) => ProfileSlot::Loaded(profile),
                None => ProfileSlot::Missing,
            },
            Err(err) => {
                warn!("Profile load failed for session {}: {}", session_id, err);
                ProfileSlot::Failed(err.to_string())
            }
        };

        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(session_id) else {
            debug!("Discarding profile for session {} that is no longer tracked", session_id);
            return;
        };
        if let (None, ProfileSlot::Loaded(profile)) = (&entry.user.email, &slot) {
            entry.user.email = Some(profile.email.clone());
        }
        entry.profile = Some(slot);
    }

    pub async fn clear(&self, session_id: &Id<AuthSession>) {
        self.entries.write().await.remove(session_id);
    }

    pub async fn rekey(
        &self,
        old_session_id: &Id<AuthSession>,
        new_session_id: Id<AuthSession>,
        refresh_expires_at: DateTime<Utc>,
    ) {
        let mut entries = self.entries.write().await;
        if let Some(mut entry) = entries.remove(old_session_id) {
            entry.refresh_expires_at = refresh_expires_at;
            entries.insert(new_session_id, entry);
        }
    }

    /// Drops entries whose refresh token has lapsed. Covers sessions whose
    /// client never came back and sign-outs the listener missed.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.refresh_expires_at > now);
        before - entries.len()
    }

    /// Replaces the profile of every live session of the identity.
    pub async fn refresh_profile(&self, identity_id: &Id<Identity>, profile: ProfileDTO) {
        let mut entries = self.entries.write().await;
        for entry in entries.values_mut().filter(|entry| &entry.user.identity_id == identity_id) {
            entry.profile = Some(ProfileSlot::Loaded(profile.clone()));
        }
    }

    pub async fn teardown(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn handle(&self, event: AuthEvent, loader: &LoadProfileInteractor) {
        match event {
            AuthEvent::SignedIn {
                session_id,
                identity_id,
                email,
                refresh_expires_at,
            } => {
                self.begin(
                    session_id,
                    CurrentUser {
                        identity_id,
                        email: Some(email),
                    },
                    refresh_expires_at,
                )
                .await;
                self.load(session_id, identity_id, loader).await;
            }
            AuthEvent::SessionRestored {
                session_id,
                identity_id,
                refresh_expires_at,
            } => {
                self.begin(
                    session_id,
                    CurrentUser {
                        identity_id,
                        email: None,
                    },
                    refresh_expires_at,
                )
                .await;
                self.load(session_id, identity_id, loader).await;
            }
            AuthEvent::SignedOut { session_id } | AuthEvent::SessionExpired { session_id } => {
                self.clear(&session_id).await;
            }
            AuthEvent::SessionRotated {
                old_session_id,
                new_session_id,
                refresh_expires_at,
            } => {
                self.rekey(&old_session_id, new_session_id, refresh_expires_at).await;
            }
            AuthEvent::ProfileUpdated { identity_id, profile } => {
                self.refresh_profile(&identity_id, profile).await;
            }
        }
    }

    async fn load(&self, session_id: Id<AuthSession>, identity_id: Id<Identity>, loader: &LoadProfileInteractor) {
        let outcome = loader
            .execute(IdDTO {
                id: identity_id.to_string(),
            })
            .await;
        self.resolve(&session_id, outcome).await;
    }
}
