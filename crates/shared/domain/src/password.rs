//! Password hashing capability.
//!
//! Callers treat hashing as opaque: `hash(plain) -> digest` and
//! `verify(plain, digest) -> bool`.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};

use crate::error::{DomainError, DomainResult};

/// Password hashing collaborator.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password into a storable digest.
    fn hash(&self, plain_text: &str) -> DomainResult<String>;

    /// Check a plain-text password against a stored digest.
    ///
    /// Malformed digests never verify.
    fn verify(&self, plain_text: &str, digest: &str) -> bool;
}

/// Argon2id hasher with default parameters and a random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
