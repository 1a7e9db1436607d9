//! Public ID Value Object
//!
//! URL-safe nanoid exposed in API responses instead of the internal UUID.

use std::fmt;

use nid::Nanoid;
use serde::{Deserialize, Serialize};

use crate::error::{UsersError, UsersResult};

/// Public-facing user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(Nanoid);

impl PublicId {
    /// Generate a fresh public ID
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    /// Parse a stored or client-supplied public ID
    pub fn parse(raw: &str) -> UsersResult<Self> {
        let nanoid: Nanoid = raw
            .parse()
            .map_err(|_| UsersError::Validation("Invalid public id".to_string()))?;
        Ok(Self(nanoid))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(PublicId::new().as_str(), PublicId::new().as_str());
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = PublicId::new();
        let parsed = PublicId::parse(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(PublicId::parse("short").is_err());
    }
}
