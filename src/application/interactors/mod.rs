pub mod auth;
pub mod form;
pub mod profile;
pub mod session;
