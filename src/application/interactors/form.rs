use std::sync::Arc;

use tracing::info;

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::form::SubmitFormDTO;
use crate::application::dto::id::IdDTO;
use crate::application::interface::db::DBSession;
use crate::application::interface::gateway::form::FormSubmissionWriter;
use crate::domain::entities::form_submission::{FormKind, FormSubmission};
use crate::domain::entities::id::Id;
use crate::domain::entities::identity::Identity;

#[derive(Clone)]
pub struct SubmitFormInteractor {
    db_session: Arc<dyn DBSession>,
    submission_writer: Arc<dyn FormSubmissionWriter>,
}

impl SubmitFormInteractor {
    pub fn new(db_session: Arc<dyn DBSession>, submission_writer: Arc<dyn FormSubmissionWriter>) -> Self {
        Self {
            db_session,
            submission_writer,
        }
    }

    pub async fn execute(&self, dto: SubmitFormDTO) -> AppResult<IdDTO> {
        let kind: FormKind = dto.kind.parse()?;
        if !dto.payload.is_object() {
            return Err(AppError::InvalidPayload("form payload must be a JSON object".to_string()));
        }
        let submitted_by: Option<Id<Identity>> = dto.identity_id.map(Id::<Identity>::try_from).transpose()?;

        let submission = FormSubmission::new(kind, dto.payload, submitted_by);
        let id = self.submission_writer.insert(submission).await?;
        self.db_session.commit().await?;
        info!("Stored {} submission {}", kind.slug(), id);
        Ok(IdDTO { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::application::app_error::{AppError, AppResult};
    use crate::application::dto::form::SubmitFormDTO;
    use crate::application::interactors::form::SubmitFormInteractor;
    use crate::application::interface::db::DBSession;
    use crate::application::interface::gateway::form::FormSubmissionWriter;
    use crate::domain::entities::form_submission::{FormKind, FormSubmission};
    use crate::domain::entities::id::Id;

    mock! {
        pub DBSessionMock {}

        #[async_trait]
        impl DBSession for DBSessionMock {
            async fn commit(&self) -> AppResult<()>;
        }
    }

    mock! {
        pub SubmissionWriterMock {}

        #[async_trait]
        impl FormSubmissionWriter for SubmissionWriterMock {
            async fn insert(&self, submission: FormSubmission) -> AppResult<Id<FormSubmission>>;
        }
    }

    const IDENTITY_ID: &str = "019c47ec-183d-744e-b11d-cd409015bf13";

    #[rstest]
    #[tokio::test]
    async fn test_submit_accelerator_application() {
        let mut db_session = MockDBSessionMock::new();
        let mut writer = MockSubmissionWriterMock::new();
        writer
            .expect_insert()
            .withf(|submission| {
                submission.kind == FormKind::AcceleratorApplication
                    && submission.payload["startup"] == "Difference Engine"
                    && submission.submitted_by.map(|id| id.to_string()).as_deref() == Some(IDENTITY_ID)
            })
            .times(1)
            .returning(|submission| Ok(submission.id));
        db_session.expect_commit().times(1).returning(|| Ok(()));

        let interactor = SubmitFormInteractor::new(Arc::new(db_session), Arc::new(writer));
        let result = interactor
            .execute(SubmitFormDTO {
                kind: "accelerator-application".to_string(),
                payload: json!({ "startup": "Difference Engine", "stage": "idea" }),
                identity_id: Some(IDENTITY_ID.to_string()),
            })
            .await
            .unwrap();

        assert!(!result.id.is_empty());
    }

    #[rstest]
    #[case("newsletter", json!({}))]
    #[case("contact", json!(["not", "an", "object"]))]
    #[case("network-join", Value::Null)]
    #[tokio::test]
    async fn test_submit_rejected_before_write(#[case] kind: &str, #[case] payload: Value) {
        let mut writer = MockSubmissionWriterMock::new();
        writer.expect_insert().never();

        let interactor = SubmitFormInteractor::new(Arc::new(MockDBSessionMock::new()), Arc::new(writer));
        let result = interactor
            .execute(SubmitFormDTO {
                kind: kind.to_string(),
                payload,
                identity_id: None,
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::UnknownFormKind(_) | AppError::InvalidPayload(_)
        ));
    }
}
