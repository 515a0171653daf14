use chrono::{DateTime, Utc};

use crate::application::dto::profile::ProfileDTO;
use crate::domain::entities::{auth_session::AuthSession, id::Id, identity::Identity};

/// Auth state changes, in the order the backend observed them.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn {
        session_id: Id<AuthSession>,
        identity_id: Id<Identity>,
        email: String,
        refresh_expires_at: DateTime<Utc>,
    },
    /// A valid session the store was not tracking, e.g. one issued before a
    /// restart.
    SessionRestored {
        session_id: Id<AuthSession>,
        identity_id: Id<Identity>,
        refresh_expires_at: DateTime<Utc>,
    },
    SignedOut {
        session_id: Id<AuthSession>,
    },
    SessionRotated {
        old_session_id: Id<AuthSession>,
        new_session_id: Id<AuthSession>,
        refresh_expires_at: DateTime<Utc>,
    },
    SessionExpired {
        session_id: Id<AuthSession>,
    },
    ProfileUpdated {
        identity_id: Id<Identity>,
        profile: ProfileDTO,
    },
}

pub trait AuthEventPublisher: Send + Sync {
    fn publish(&self, event: AuthEvent);
}
