//! Users Configuration

use std::time::Duration;

/// Users application configuration
#[derive(Debug, Clone)]
pub struct UsersConfig {
    /// Optional pepper mixed into password hashes
    pub pepper: Option<String>,
    /// Lifetime of a wallet-link nonce
    pub nonce_ttl: Duration,
    /// Entropy of generated API keys
    pub api_key_bytes: usize,
    /// Default language for new accounts
    pub default_language: String,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            nonce_ttl: Duration::from_secs(300),
            api_key_bytes: 32,
            default_language: "ru".to_string(),
        }
    }
}

impl UsersConfig {
    pub fn pepper(&self) -> Option<&str> {
        self.pepper.as_deref()
    }
}
