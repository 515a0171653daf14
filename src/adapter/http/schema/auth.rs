use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_email::Email;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::adapter::http::schema::profile::ProfileResponse;
use crate::application::session_store::{ProfileSlot, SessionPhase, SessionSnapshot};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[schema(value_type = String)]
    pub email: Email,
    /// At least 8 characters with an uppercase letter, a digit and a symbol.
    #[schema(min_length = 8, max_length = 128)]
    #[validate(
        length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"),
        custom(function = "strong_password")
    )]
    pub password: String,
    /// One of `founder`, `expert`, `investor`, `interested`.
    #[serde(default)]
    pub role: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: Option<String>,
}

const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?~`";

/// Reports the first missing character class so the client can say which
/// rule the password broke.
fn strong_password(password: &str) -> Result<(), ValidationError> {
    let missing = if !password.chars().any(|c| c.is_ascii_uppercase()) {
        ("password_no_uppercase", "Password must contain an uppercase letter (A-Z)")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        ("password_no_digit", "Password must contain a digit (0-9)")
    } else if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        ("password_no_symbol", "Password must contain a symbol such as ! or #")
    } else {
        return Ok(());
    };
    Err(ValidationError::new(missing.0).with_message(missing.1.into()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub identity_id: String,
    /// False while the email still has to be confirmed.
    pub signed_in: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub identity_id: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileSlotResponse {
    Loaded { profile: ProfileResponse },
    Missing,
    Failed { error: String },
}

impl From<ProfileSlot> for ProfileSlotResponse {
    fn from(slot: ProfileSlot) -> Self {
        match slot {
            ProfileSlot::Loaded(profile) => ProfileSlotResponse::Loaded {
                profile: profile.into(),
            },
            ProfileSlot::Missing => ProfileSlotResponse::Missing,
            ProfileSlot::Failed(error) => ProfileSlotResponse::Failed { error },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStateResponse {
    /// `unauthenticated`, `loading` or `ready`.
    pub phase: String,
    pub user: Option<CurrentUserResponse>,
    pub profile: Option<ProfileSlotResponse>,
}

impl From<SessionSnapshot> for SessionStateResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        let phase = match snapshot.phase {
            SessionPhase::Unauthenticated => "unauthenticated",
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
        };
        Self {
            phase: phase.to_string(),
            user: snapshot.user.map(|user| CurrentUserResponse {
                id: user.identity_id.to_string(),
                email: user.email,
            }),
            profile: snapshot.profile.map(ProfileSlotResponse::from),
        }
    }
}
