use crate::{
    application::app_error::AppResult,
    domain::entities::{id::Id, identity::Identity},
};
use async_trait::async_trait;

#[async_trait]
pub trait IdentityWriter: Send + Sync {
    /// Fails with `EmailAlreadyRegistered` when the email is taken.
    async fn insert(&self, identity: Identity) -> AppResult<Id<Identity>>;
}

#[async_trait]
pub trait IdentityReader: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>>;
    async fn find_by_id(&self, identity_id: &Id<Identity>) -> AppResult<Option<Identity>>;
}
