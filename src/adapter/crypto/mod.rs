pub mod argon2;
pub mod token;
