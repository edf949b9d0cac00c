//! Password hashing with Argon2id.
//!
//! Stored admin passwords are PHC strings; plaintext is never kept.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use smartgen_shared::AppError;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// Stored hash is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Hashes a password into a PHC string with a random salt.
///
/// ```
/// use smartgen_core::auth::hash_password;
///
/// let hash = hash_password("change-me").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a password against a PHC hash.
///
/// Returns `Ok(false)` on mismatch; errors are reserved for malformed hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Checks an admin login password.
///
/// Accepts the admin's own password, or the shared password when one is
/// configured (`shared_hash` is `None` otherwise).
pub fn check_admin_password(
    password: &str,
    admin_hash: &str,
    shared_hash: Option<&str>,
) -> Result<bool, PasswordError> {
    if verify_password(password, admin_hash)? {
        return Ok(true);
    }
    match shared_hash {
        Some(hash) => verify_password(password, hash),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_and_salted() {
        let hash1 = hash_password("password1").unwrap();
        let hash2 = hash_password("password1").unwrap();

        assert!(hash1.starts_with("$argon2id$"));
        assert_ne!(hash1, "password1");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "plaintext-password");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_shared_password_only_when_configured() {
        let own = hash_password("own-secret").unwrap();
        let shared = hash_password("shared-secret").unwrap();

        assert!(check_admin_password("own-secret", &own, None).unwrap());
        assert!(!check_admin_password("shared-secret", &own, None).unwrap());
        assert!(check_admin_password("shared-secret", &own, Some(&shared)).unwrap());
        assert!(!check_admin_password("guess", &own, Some(&shared)).unwrap());
    }
}
