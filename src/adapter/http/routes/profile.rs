use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::middleware::extractor::AuthUser;
use crate::adapter::http::schema::profile::{ProfileResponse, UpdateProfileRequest};
use crate::adapter::http::validation::ValidJson;
use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::id::IdDTO;
use crate::application::dto::profile::UpdateProfileDTO;
use crate::application::interactors::profile::{LoadProfileInteractor, UpdateProfileInteractor};

#[utoipa::path(
    get,
    path = "/profiles/me",
    tag = "Profiles",
    responses(
        (
            status = 200,
            description = "Profile of the signed-in identity, created with the default role if it was missing",
            body = ProfileResponse
        ),
        (
            status = 401,
            description = "Missing or invalid session",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Not authenticated"
                }
            )
        ),
        (
            status = 404,
            description = "The identity behind the session no longer exists",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Profile not found"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse
        )
    ),
    security(("cookieAuth" = []))
)]
pub async fn get_me(auth_user: AuthUser, interactor: LoadProfileInteractor) -> AppResult<impl IntoResponse> {
    let dto = IdDTO {
        id: auth_user.identity_id.to_string(),
    };
    let profile = interactor
        .execute(dto)
        .await?
        .into_profile()
        .ok_or(AppError::ProfileNotFound)?;
    Ok((StatusCode::OK, Json(ProfileResponse::from(profile))))
}

#[utoipa::path(
    patch,
    path = "/profiles/me",
    tag = "Profiles",
    request_body(
        content = UpdateProfileRequest,
        example = json!(
            {
                "company": "Acme Robotics",
                "role": "founder"
            }
        )
    ),
    responses(
        (
            status = 200,
            description = "Updated profile; omitted fields are unchanged",
            body = ProfileResponse
        ),
        (
            status = 400,
            description = "Invalid role or field",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid role: admin"
                }
            )
        ),
        (
            status = 401,
            description = "Missing or invalid session",
            body = ErrorResponse
        ),
        (
            status = 404,
            description = "No profile exists yet",
            body = ErrorResponse
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse
        )
    ),
    security(("cookieAuth" = []))
)]
pub async fn update_me(
    auth_user: AuthUser,
    interactor: UpdateProfileInteractor,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = UpdateProfileDTO {
        identity_id: Some(auth_user.identity_id.to_string()),
        full_name: payload.full_name,
        role: payload.role,
        company: payload.company,
        bio: payload.bio,
    };
    let profile = interactor.execute(dto).await?;
    Ok((StatusCode::OK, Json(ProfileResponse::from(profile))))
}
