//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_role::UserRole, wallet_address::WalletAddress,
};

/// User entity
///
/// The internal UUID stays server-side; API responses carry the public
/// nanoid. The password hash is a PHC string owned by the platform crate.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    pub email: Email,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Opaque API key used for request authentication
    pub api_key: String,
    pub role: UserRole,
    /// End of the current ban window, if any
    pub banned_until: Option<DateTime<Utc>>,
    pub wallet_address: Option<WalletAddress>,
    /// Reward balance mirrored by ledger transactions
    pub baraka_points: i64,
    /// BCP-47-ish language tag injected into module requests
    pub language: String,
    /// Free-form preference map
    pub preferences: Value,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: Email, password_hash: String, api_key: String, language: String) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            password_hash,
            api_key,
            role: UserRole::default(),
            banned_until: None,
            wallet_address: None,
            baraka_points: 0,
            language,
            preferences: Value::Object(serde_json::Map::new()),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account is inside a ban window
    pub fn is_banned(&self, now: DateTime<Utc>) -> bool {
        self.banned_until.is_some_and(|until| until > now)
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Open a ban window ending at `until`
    pub fn ban_until(&mut self, until: DateTime<Utc>) {
        self.banned_until = Some(until);
        self.updated_at = Utc::now();
    }

    /// Close any ban window
    pub fn lift_ban(&mut self) {
        self.banned_until = None;
        self.updated_at = Utc::now();
    }

    /// Attach a wallet address
    pub fn link_wallet(&mut self, wallet: WalletAddress) {
        self.wallet_address = Some(wallet);
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_language(&mut self, language: String) {
        self.language = language;
        self.updated_at = Utc::now();
    }

    pub fn set_preferences(&mut self, preferences: Value) {
        self.preferences = preferences;
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User::new(
            Email::new("test@example.com").unwrap(),
            "$argon2id$stub".to_string(),
            "key".to_string(),
            "en".to_string(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.baraka_points, 0);
        assert!(user.banned_until.is_none());
        assert!(user.wallet_address.is_none());
    }

    #[test]
    fn test_ban_window() {
        let mut user = user();
        let now = Utc::now();
        assert!(!user.is_banned(now));

        user.ban_until(now + Duration::hours(1));
        assert!(user.is_banned(now));
        // Expired window no longer counts as banned
        assert!(!user.is_banned(now + Duration::hours(2)));

        user.lift_ban();
        assert!(!user.is_banned(now));
    }
}
