use crate::application::{
    app_error::{AppError, AppResult},
    interface::crypto::CredentialsHasher,
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

#[derive(Default, Clone)]
pub struct ArgonPasswordHasher {
    hasher: Argon2<'static>,
}

#[async_trait]
impl CredentialsHasher for ArgonPasswordHasher {
    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|_| AppError::PasswordHashError)
        })
        .await
        .map_err(|_| AppError::PasswordHashError)?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            // A stored hash that does not parse is treated as a failed check.
            let parsed_hash = PasswordHash::new(&hashed).map_err(|_| AppError::InvalidCredentials)?;
            Ok(hasher.verify_password(password.as_bytes(), &parsed_hash).is_ok())
        })
        .await
        .map_err(|_| AppError::InvalidCredentials)?
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const PASSWORD: &str = "Password123!";

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = ArgonPasswordHasher::default();
        let hash = hasher.hash_password(PASSWORD).await.expect("hash password");

        assert!(hash.starts_with("$argon2"), "PHC string expected, got {}", hash);
        assert!(hasher.verify_password(PASSWORD, &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = ArgonPasswordHasher::default();
        let first = hasher.hash_password(PASSWORD).await.unwrap();
        let second = hasher.hash_password(PASSWORD).await.unwrap();
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("InvalidPassword123!")]
    #[case("password123!")]
    #[case("")]
    #[tokio::test]
    async fn test_verify_rejects_other_passwords(#[case] attempt: &str) {
        let hasher = ArgonPasswordHasher::default();
        let hash = hasher.hash_password(PASSWORD).await.unwrap();
        assert!(!hasher.verify_password(attempt, &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_invalid_hash_format() {
        let hasher = ArgonPasswordHasher::default();
        let result = hasher.verify_password(PASSWORD, "invalid").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
