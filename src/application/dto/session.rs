use chrono::{DateTime, Utc};

use crate::domain::entities::{auth_session::AuthSession, id::Id, identity::Identity};

#[derive(Debug, Clone, Copy)]
pub struct SessionTtls {
    pub access_ttl: i64,
    pub refresh_ttl: i64,
}

#[derive(Debug, Clone)]
pub struct SessionTokensDTO {
    pub identity_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<&AuthSession> for SessionTokensDTO {
    fn from(session: &AuthSession) -> Self {
        Self {
            identity_id: session.identity_id.to_string(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
            refresh_expires_at: session.refresh_expires_at,
        }
    }
}

#[derive(Debug)]
pub struct ValidateSessionDTO {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub ttls: SessionTtls,
}

#[derive(Debug, Clone)]
pub enum SessionValidationResult {
    Valid {
        identity_id: Id<Identity>,
        session_id: Id<AuthSession>,
        refresh_expires_at: DateTime<Utc>,
    },
    Rotated {
        identity_id: Id<Identity>,
        session_id: Id<AuthSession>,
        tokens: SessionTokensDTO,
    },
    Expired,
    Invalid,
}
