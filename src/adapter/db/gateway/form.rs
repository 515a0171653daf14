use async_trait::async_trait;
use futures::FutureExt;
use sqlx::Row;
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::form::FormSubmissionWriter;
use crate::domain::entities::form_submission::FormSubmission;
use crate::domain::entities::id::Id;

pub struct FormSubmissionGateway {
    session: SqlxSession,
}

impl FormSubmissionGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FormSubmissionWriter for FormSubmissionGateway {
    async fn insert(&self, submission: FormSubmission) -> AppResult<Id<FormSubmission>> {
        self.session
            .with_tx(|tx| {
                // Table names come from a closed enum, never from the request.
                let query = format!(
                    "INSERT INTO {} (id, payload, submitted_by, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
                    submission.kind.table()
                );
                async move {
                    let result = sqlx::query(&query)
                        .bind(submission.id.value)
                        .bind(&submission.payload)
                        .bind(submission.submitted_by.map(|id| id.value))
                        .bind(submission.created_at)
                        .fetch_one(tx.as_mut())
                        .await?;
                    let id: Uuid = result.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }
}
