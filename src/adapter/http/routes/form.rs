use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::middleware::extractor::AuthUser;
use crate::adapter::http::schema::form::FormSubmittedResponse;
use crate::application::app_error::AppResult;
use crate::application::dto::form::SubmitFormDTO;
use crate::application::interactors::form::SubmitFormInteractor;

#[utoipa::path(
    post,
    path = "/forms/{kind}",
    tag = "Forms",
    params(
        ("kind" = String, Path, description = "One of `network-join`, `accelerator-application`, `contact`")
    ),
    request_body(
        content = Object,
        description = "Opaque form fields",
        example = json!(
            {
                "name": "Ada Lovelace",
                "message": "I would like to mentor founders."
            }
        )
    ),
    responses(
        (
            status = 201,
            description = "Submission stored",
            body = FormSubmittedResponse
        ),
        (
            status = 400,
            description = "Body is not a JSON object",
            body = ErrorResponse
        ),
        (
            status = 404,
            description = "Unknown form kind",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Unknown form: survey"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse
        )
    )
)]
pub async fn submit_form(
    Path(kind): Path<String>,
    auth_user: Option<AuthUser>,
    interactor: SubmitFormInteractor,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let dto = SubmitFormDTO {
        kind: kind.clone(),
        payload,
        identity_id: auth_user.map(|user| user.identity_id.to_string()),
    };
    let submission = interactor.execute(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(FormSubmittedResponse { id: submission.id, kind }),
    ))
}
