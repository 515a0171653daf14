use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{id::Id, identity::Identity};

/// A signed-in session. The id stays server-side; clients only ever see the
/// two random tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: Id<AuthSession>,
    pub access_token: String,
    pub refresh_token: String,
    pub identity_id: Id<Identity>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Active,
    /// Access token is past its expiry but the refresh token is still usable.
    Refreshable,
    Expired,
}

impl AuthSession {
    pub fn issue(
        identity_id: Id<Identity>,
        access_token: String,
        refresh_token: String,
        now: DateTime<Utc>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            id: Id::generate(),
            access_token,
            refresh_token,
            identity_id,
            created_at: now,
            expires_at: now + access_ttl,
            refresh_expires_at: now + refresh_ttl,
        }
    }

    pub fn token_state(&self, now: DateTime<Utc>) -> TokenState {
        if now >= self.refresh_expires_at {
            return TokenState::Expired;
        }
        if now >= self.expires_at {
            return TokenState::Refreshable;
        }
        TokenState::Active
    }
}
