use crate::{
    application::app_error::AppResult,
    domain::entities::{form_submission::FormSubmission, id::Id},
};
use async_trait::async_trait;

#[async_trait]
pub trait FormSubmissionWriter: Send + Sync {
    async fn insert(&self, submission: FormSubmission) -> AppResult<Id<FormSubmission>>;
}
