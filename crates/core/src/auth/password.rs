//! Argon2id password hashing.
//!
//! Hashes are stored in PHC string form (`$argon2id$v=19$...`), so the salt and
//! parameters travel with the hash.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Failures while hashing or checking a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// The stored hash is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Hashes a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use tally_core::auth::hash_password;
///
/// let hash = hash_password("groceries-2024").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`; only malformed hashes or internal failures are errors.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` for a malformed hash and
/// `PasswordError::VerifyError` for any other failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}
