//! Argon2id implementation of the `PasswordHasher` port.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;

use domains::error::{DomainError, Result};
use domains::ports::PasswordHasher;

/// Stateless; `Argon2::default()` picks the argon2id variant with the
/// crate's recommended parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| DomainError::Internal(format!("password hashing failed: {err}")))
    }

    fn verify(&self, password: &str, phc: &str) -> bool {
        // An unparseable stored hash is treated the same as a mismatch:
        // the caller only learns "could not authenticate".
        let Ok(parsed) = PasswordHash::new(phc) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
