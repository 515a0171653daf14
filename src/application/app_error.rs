use axum::extract::rejection::JsonRejection;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email is not confirmed")]
    EmailNotConfirmed,
    #[error("Email is already registered")]
    EmailAlreadyRegistered,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Unknown form: {0}")]
    UnknownFormKind(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Json error: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Password hash error")]
    PasswordHashError,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;
