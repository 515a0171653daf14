use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::application::app_error::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId(_)
            | AppError::InvalidRole(_)
            | AppError::InvalidPayload(_)
            | AppError::ValidationError(_)
            | AppError::JsonRejection(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::EmailNotConfirmed => StatusCode::FORBIDDEN,
            AppError::ProfileNotFound | AppError::UnknownFormKind(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            AppError::PasswordHashError | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
