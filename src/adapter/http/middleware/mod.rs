pub mod auth;
pub mod extractor;
pub mod guard;
