//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the infrastructure
//! layer.

use kernel::id::UserId;

use crate::domain::entity::User;
use crate::error::UsersResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    async fn create(&self, user: &User) -> UsersResult<()>;

    /// Find by internal id
    async fn find_by_id(&self, user_id: &UserId) -> UsersResult<Option<User>>;

    /// Find by public id
    async fn find_by_public_id(&self, public_id: &str) -> UsersResult<Option<User>>;

    /// Find by canonical email
    async fn find_by_email(&self, email: &str) -> UsersResult<Option<User>>;

    /// Find by API key
    async fn find_by_api_key(&self, api_key: &str) -> UsersResult<Option<User>>;

    /// Find by linked wallet address
    async fn find_by_wallet(&self, wallet_address: &str) -> UsersResult<Option<User>>;

    /// Page through users; returns the page and the total count
    async fn list(&self, skip: i64, limit: i64) -> UsersResult<(Vec<User>, i64)>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> UsersResult<()>;

    /// Delete a user permanently
    async fn delete(&self, user_id: &UserId) -> UsersResult<()>;
}
