use std::fmt::Write;

use rand::Rng;

use crate::application::interface::crypto::TokenGenerator;

/// 32 random bytes, hex encoded.
#[derive(Default, Clone)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let bytes: [u8; 32] = rand::rng().random();
        let mut token = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            let _ = write!(token, "{b:02x}");
        }
        token
    }
}
