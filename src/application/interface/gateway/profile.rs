use crate::{
    application::app_error::AppResult,
    domain::entities::{id::Id, profile::Profile},
};
use async_trait::async_trait;

#[async_trait]
pub trait ProfileWriter: Send + Sync {
    /// Insert-or-update keyed by id. On conflict the incoming row wins for
    /// role, full name and email; created_at of the existing row is kept.
    async fn upsert(&self, profile: Profile) -> AppResult<Id<Profile>>;

    /// Insert only if no row exists for the id. Returns whether this call
    /// created the row; callers re-read to get the surviving one.
    async fn insert_if_absent(&self, profile: Profile) -> AppResult<bool>;

    async fn update(&self, profile: Profile) -> AppResult<Id<Profile>>;
}

#[async_trait]
pub trait ProfileReader: Send + Sync {
    async fn find_by_id(&self, profile_id: &Id<Profile>) -> AppResult<Option<Profile>>;
}
