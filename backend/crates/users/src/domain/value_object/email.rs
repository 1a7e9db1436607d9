//! Email Value Object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{UsersError, UsersResult};

/// Validated, canonicalized (lowercase) email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and canonicalize an email address
    ///
    /// Deliberately lenient: one `@`, non-empty local part, and a domain
    /// containing a dot. Anything stricter belongs to a confirmation mail.
    pub fn new(raw: impl Into<String>) -> UsersResult<Self> {
        let canonical = raw.into().trim().to_lowercase();

        let Some((local, domain)) = canonical.split_once('@') else {
            return Err(UsersError::Validation("Invalid email format".to_string()));
        };
        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || canonical.contains(char::is_whitespace)
        {
            return Err(UsersError::Validation("Invalid email format".to_string()));
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_and_canonicalizes() {
        let email = Email::new("  Fatima@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "fatima@example.com");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("user@nodot").is_err());
        assert!(Email::new("user@.com").is_err());
        assert!(Email::new("user name@example.com").is_err());
    }
}
