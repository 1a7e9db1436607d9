//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entity::User;

// ----------------------------------------------------------------------
// Create / Login
// ----------------------------------------------------------------------

/// Create user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub language: Option<String>,
}

/// Create user response; the API key is only ever returned here and on login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user: UserResponse,
    pub api_key: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub public_id: String,
    pub api_key: String,
    pub role: String,
}

// ----------------------------------------------------------------------
// Profile
// ----------------------------------------------------------------------

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub public_id: String,
    pub email: String,
    pub role: String,
    pub banned_until: Option<DateTime<Utc>>,
    pub wallet_address: Option<String>,
    pub baraka_points: i64,
    pub language: String,
    pub preferences: Value,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.code().to_string(),
            banned_until: user.banned_until,
            wallet_address: user.wallet_address.as_ref().map(|w| w.as_str().to_string()),
            baraka_points: user.baraka_points,
            language: user.language.clone(),
            preferences: user.preferences.clone(),
        }
    }
}

/// Update user request; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub language: Option<String>,
    pub preferences: Option<Value>,
    pub password: Option<String>,
}

/// Paginated user list (admin only)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
}

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

// ----------------------------------------------------------------------
// Moderation
// ----------------------------------------------------------------------

/// Block user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserRequest {
    pub duration_secs: i64,
}

// ----------------------------------------------------------------------
// Wallet linking
// ----------------------------------------------------------------------

/// Wallet link message response (step 1)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletLinkMessageResponse {
    pub message: String,
}

/// Wallet link request (step 2)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletLinkRequest {
    pub wallet_address: String,
    pub signature: String,
}
