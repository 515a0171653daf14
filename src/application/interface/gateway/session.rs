use crate::{
    application::app_error::AppResult,
    domain::entities::{auth_session::AuthSession, id::Id},
};
use async_trait::async_trait;

#[async_trait]
pub trait SessionWriter: Send + Sync {
    async fn insert(&self, session: AuthSession) -> AppResult<Id<AuthSession>>;
    async fn rotate(&self, old_session_id: &Id<AuthSession>, new_session: AuthSession) -> AppResult<Id<AuthSession>>;
    async fn delete(&self, session_id: &Id<AuthSession>) -> AppResult<()>;
}

#[async_trait]
pub trait SessionReader: Send + Sync {
    async fn find_by_access_token(&self, access_token: &str) -> AppResult<Option<AuthSession>>;
}
