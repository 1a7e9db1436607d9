//! Wallet Address Value Object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{UsersError, UsersResult};

/// EVM-style wallet address: `0x` followed by 40 hex digits
///
/// Stored lowercase; checksum casing is not enforced here because the
/// external verifier receives the original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(raw: impl Into<String>) -> UsersResult<Self> {
        let raw = raw.into();
        let hex_part = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| UsersError::Validation("Invalid wallet address".to_string()))?;

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UsersError::Validation("Invalid wallet address".to_string()));
        }

        Ok(Self(format!("0x{}", hex_part.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_and_lowercases() {
        let addr = WalletAddress::new("0xAbCdEf0123456789abcdef0123456789ABCDEF01").unwrap();
        assert_eq!(addr.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(WalletAddress::new("abcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(WalletAddress::new("0x1234").is_err());
        assert!(WalletAddress::new("0xZZcdef0123456789abcdef0123456789abcdef01").is_err());
    }
}
