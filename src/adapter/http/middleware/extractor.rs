use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use crate::application::app_error::{AppError, AppResult};
use crate::domain::entities::{auth_session::AuthSession, id::Id, identity::Identity};

/// Identity and session of a request that passed the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity_id: Id<Identity>,
    pub session_id: Id<AuthSession>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::NotAuthenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Option<Self>> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
