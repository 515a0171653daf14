pub mod form;
pub mod identity;
pub mod profile;
pub mod session;
