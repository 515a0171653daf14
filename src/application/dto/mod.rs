pub mod auth;
pub mod form;
pub mod id;
pub mod profile;
pub mod session;
