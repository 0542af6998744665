//! One-way salted password hashing.
//!
//! Argon2id with fixed cost parameters; digests are PHC strings that embed
//! their own salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AppError;

/// Digest with the default cost parameters that matches no password.
///
/// Login verifies against it for unknown usernames so both failure paths
/// run one Argon2 pass.
pub const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$oKNyOMfJTyTDlypBHvLY+w$SGBvD7JeycIJQtRXt0cGNOGA8NhUjPksRJboA4AvpR4";

/// Hashes and verifies passwords.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Argon2id, 19 MiB memory, 2 passes, 1 lane.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// Produce a self-salted digest of `plaintext`.
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// A digest that does not parse is treated as a mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            tracing::warn!("Stored password digest is not a valid PHC string");
            return false;
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
