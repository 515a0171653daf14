use crate::application::dto::session::{SessionTokensDTO, SessionTtls};

#[derive(Debug)]
pub struct SignUpDTO {
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub require_email_confirmation: bool,
    pub ttls: SessionTtls,
}

#[derive(Debug, Clone)]
pub struct SignUpResultDTO {
    pub identity_id: String,
    /// Present when the backend issued a session right away.
    pub session: Option<SessionTokensDTO>,
}

#[derive(Debug)]
pub struct SignInDTO {
    pub email: String,
    pub password: String,
    pub ttls: SessionTtls,
}

#[derive(Debug)]
pub struct SignOutDTO {
    pub session_id: String,
}
