//! Password Hashing and Verification
//!
//! NIST SP 800-63B compliant password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Pepper support for an additional security layer

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone` to prevent accidental copies; the debug
/// output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is normalized using NFKC before validation; lengths are
    /// counted in code points, not bytes.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        // NIST: Unicode NFKC normalization before processing
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        if normalized.chars().any(|c| c.is_control()) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(normalized))
    }

    /// Access the normalized password bytes
    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClearTextPassword(***)")
    }
}

/// Argon2id password hash in PHC string format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash a clear text password with Argon2id
    ///
    /// The optional pepper is mixed into the hash input; losing it
    /// invalidates every stored hash.
    pub fn from_clear_text(
        password: &ClearTextPassword,
        pepper: Option<&str>,
    ) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let input = peppered(password, pepper);

        let hash = Argon2::default()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(Self(hash.to_string()))
    }

    /// Restore from a stored PHC string
    pub fn from_phc_string(phc: String) -> Result<Self, PasswordHashError> {
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self(phc))
    }

    /// Verify a clear text password against this hash (constant-time inside argon2)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&str>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        let input = peppered(password, pepper);
        Argon2::default().verify_password(&input, &parsed).is_ok()
    }

    /// The PHC string for storage
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the PHC string
    pub fn into_string(self) -> String {
        self.0
    }
}

fn peppered(password: &ClearTextPassword, pepper: Option<&str>) -> Vec<u8> {
    let mut input = password.as_bytes().to_vec();
    if let Some(pepper) = pepper {
        input.extend_from_slice(pepper.as_bytes());
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_short_and_empty() {
        assert!(matches!(
            ClearTextPassword::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { .. })
        ));
        assert!(matches!(
            ClearTextPassword::new("   ".to_string()),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
        assert!(matches!(
            ClearTextPassword::new("with\u{0007}control".to_string()),
            Err(PasswordPolicyError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_policy_rejects_too_long() {
        let long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(
            ClearTextPassword::new(long),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = HashedPassword::from_clear_text(&password, None).unwrap();

        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::new("wrong password!".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_pepper_changes_verification() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = HashedPassword::from_clear_text(&password, Some("pepper")).unwrap();

        assert!(hashed.verify(&password, Some("pepper")));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some("other")));
    }

    #[test]
    fn test_phc_roundtrip() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = HashedPassword::from_clear_text(&password, None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&password, None));

        assert!(HashedPassword::from_phc_string("not a hash".to_string()).is_err());
    }

    #[test]
    fn test_nfkc_normalization_equivalence() {
        // Full-width and half-width forms normalize to the same bytes
        let a = ClearTextPassword::new("ｐａｓｓｗｏｒｄ１２３".to_string()).unwrap();
        let b = ClearTextPassword::new("password123".to_string()).unwrap();
        let hashed = HashedPassword::from_clear_text(&a, None).unwrap();
        assert!(hashed.verify(&b, None));
    }
}
