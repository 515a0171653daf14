pub mod auth_session;
pub mod form_submission;
pub mod id;
pub mod identity;
pub mod profile;
