//! Unit tests for the users crate
//!
//! Use cases run against an in-memory repository; only the Postgres
//! implementation needs a live database and is covered by integration
//! environments.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use kernel::id::UserId;
use tokio::sync::Mutex;

use crate::application::config::UsersConfig;
use crate::application::{
    CreateUserInput, CreateUserUseCase, LoginInput, LoginUseCase, ModerationUseCase,
    UpdateUserInput, UpdateUserUseCase, WalletLinkUseCase,
};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{UsersError, UsersResult};
use crate::infra::wallet_stub::StubWalletVerifier;
use platform::cache::{CacheStore, MemoryCache};

/// In-memory user repository for use case tests
#[derive(Clone, Default)]
struct InMemoryUsersRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUsersRepository {
    fn new() -> Self {
        Self::default()
    }

    async fn find_where<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .lock()
            .await
            .values()
            .find(|u| predicate(u))
            .cloned()
    }
}

impl UserRepository for InMemoryUsersRepository {
    async fn create(&self, user: &User) -> UsersResult<()> {
        self.users
            .lock()
            .await
            .insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> UsersResult<Option<User>> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> UsersResult<Option<User>> {
        Ok(self.find_where(|u| u.public_id.as_str() == public_id).await)
    }

    async fn find_by_email(&self, email: &str) -> UsersResult<Option<User>> {
        Ok(self.find_where(|u| u.email.as_str() == email).await)
    }

    async fn find_by_api_key(&self, api_key: &str) -> UsersResult<Option<User>> {
        Ok(self.find_where(|u| u.api_key == api_key).await)
    }

    async fn find_by_wallet(&self, wallet_address: &str) -> UsersResult<Option<User>> {
        Ok(self
            .find_where(|u| {
                u.wallet_address
                    .as_ref()
                    .is_some_and(|w| w.as_str() == wallet_address)
            })
            .await)
    }

    async fn list(&self, skip: i64, limit: i64) -> UsersResult<(Vec<User>, i64)> {
        let users = self.users.lock().await;
        let total = users.len() as i64;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        let page = all
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, user: &User) -> UsersResult<()> {
        self.users
            .lock()
            .await
            .insert(user.user_id, user.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> UsersResult<()> {
        self.users.lock().await.remove(user_id);
        Ok(())
    }
}

fn config() -> Arc<UsersConfig> {
    Arc::new(UsersConfig::default())
}

async fn create_user(
    repo: &Arc<InMemoryUsersRepository>,
    email: &str,
    password: &str,
) -> User {
    CreateUserUseCase::new(repo.clone(), config())
        .execute(CreateUserInput {
            email: email.to_string(),
            password: password.to_string(),
            language: None,
        })
        .await
        .expect("user created")
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn creates_user_with_api_key_and_defaults() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let user = create_user(&repo, "fatima@example.com", "strong password 1").await;

        assert_eq!(user.email.as_str(), "fatima@example.com");
        assert_eq!(user.api_key.len(), 64);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.language, "ru");
        // Password is stored hashed, never verbatim
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        create_user(&repo, "fatima@example.com", "strong password 1").await;

        let result = CreateUserUseCase::new(repo.clone(), config())
            .execute(CreateUserInput {
                email: "Fatima@Example.com".to_string(),
                password: "another password".to_string(),
                language: None,
            })
            .await;
        assert!(matches!(result, Err(UsersError::EmailTaken)));
    }

    #[tokio::test]
    async fn rejects_weak_password() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let result = CreateUserUseCase::new(repo.clone(), config())
            .execute(CreateUserInput {
                email: "fatima@example.com".to_string(),
                password: "short".to_string(),
                language: None,
            })
            .await;
        assert!(matches!(result, Err(UsersError::Validation(_))));
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn succeeds_with_correct_credentials() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let user = create_user(&repo, "fatima@example.com", "strong password 1").await;

        let output = LoginUseCase::new(repo.clone(), config())
            .execute(LoginInput {
                email: "FATIMA@example.com".to_string(),
                password: "strong password 1".to_string(),
            })
            .await
            .expect("login succeeds");
        assert_eq!(output.public_id, user.public_id.to_string());
        assert_eq!(output.api_key, user.api_key);
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_email() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        create_user(&repo, "fatima@example.com", "strong password 1").await;
        let use_case = LoginUseCase::new(repo.clone(), config());

        let wrong = use_case
            .execute(LoginInput {
                email: "fatima@example.com".to_string(),
                password: "wrong password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(UsersError::InvalidCredentials)));

        let unknown = use_case
            .execute(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "strong password 1".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(UsersError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn rejects_banned_user_until_window_ends() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let mut user = create_user(&repo, "fatima@example.com", "strong password 1").await;
        let use_case = LoginUseCase::new(repo.clone(), config());

        user.ban_until(Utc::now() + Duration::hours(1));
        repo.update(&user).await.unwrap();
        let banned = use_case
            .execute(LoginInput {
                email: "fatima@example.com".to_string(),
                password: "strong password 1".to_string(),
            })
            .await;
        assert!(matches!(banned, Err(UsersError::AccountBanned { .. })));

        // Expired window allows login again
        user.ban_until(Utc::now() - Duration::minutes(1));
        repo.update(&user).await.unwrap();
        let allowed = use_case
            .execute(LoginInput {
                email: "fatima@example.com".to_string(),
                password: "strong password 1".to_string(),
            })
            .await;
        assert!(allowed.is_ok());
    }
}

mod moderation {
    use super::*;

    async fn admin(repo: &Arc<InMemoryUsersRepository>) -> User {
        let mut admin = create_user(repo, "admin@example.com", "administrator 1").await;
        admin.set_role(UserRole::Admin);
        repo.update(&admin).await.unwrap();
        admin
    }

    #[tokio::test]
    async fn admin_blocks_and_unblocks_user() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let admin = admin(&repo).await;
        let target = create_user(&repo, "user@example.com", "strong password 1").await;
        let use_case = ModerationUseCase::new(repo.clone());

        let blocked = use_case
            .block(&admin, target.public_id.as_str(), 3600)
            .await
            .expect("block succeeds");
        assert!(blocked.is_banned(Utc::now()));

        let unblocked = use_case
            .unblock(&admin, target.public_id.as_str())
            .await
            .expect("unblock succeeds");
        assert!(unblocked.banned_until.is_none());
    }

    #[tokio::test]
    async fn non_admin_cannot_block() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let user = create_user(&repo, "user@example.com", "strong password 1").await;
        let target = create_user(&repo, "other@example.com", "strong password 1").await;

        let result = ModerationUseCase::new(repo.clone())
            .block(&user, target.public_id.as_str(), 3600)
            .await;
        assert!(matches!(result, Err(UsersError::PermissionDenied)));
    }

    #[tokio::test]
    async fn admin_cannot_block_admin() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let first = admin(&repo).await;
        let mut second = create_user(&repo, "admin2@example.com", "administrator 2").await;
        second.set_role(UserRole::Admin);
        repo.update(&second).await.unwrap();

        let result = ModerationUseCase::new(repo.clone())
            .block(&first, second.public_id.as_str(), 3600)
            .await;
        assert!(matches!(result, Err(UsersError::CannotBlockAdmin)));
    }

    #[tokio::test]
    async fn admin_deletes_user() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let admin = admin(&repo).await;
        let target = create_user(&repo, "user@example.com", "strong password 1").await;

        ModerationUseCase::new(repo.clone())
            .delete(&admin, target.public_id.as_str())
            .await
            .expect("delete succeeds");
        assert!(repo.find_by_id(&target.user_id).await.unwrap().is_none());
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn owner_updates_language_and_preferences() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let user = create_user(&repo, "user@example.com", "strong password 1").await;

        let updated = UpdateUserUseCase::new(repo.clone(), config())
            .execute(
                &user,
                user.public_id.as_str(),
                UpdateUserInput {
                    language: Some("en".to_string()),
                    preferences: Some(serde_json::json!({"theme": "dark"})),
                    password: None,
                },
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated.language, "en");
        assert_eq!(updated.preferences["theme"], "dark");
    }

    #[tokio::test]
    async fn stranger_cannot_update_profile() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let user = create_user(&repo, "user@example.com", "strong password 1").await;
        let stranger = create_user(&repo, "other@example.com", "strong password 1").await;

        let result = UpdateUserUseCase::new(repo.clone(), config())
            .execute(
                &stranger,
                user.public_id.as_str(),
                UpdateUserInput {
                    language: Some("en".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UsersError::PermissionDenied)));
    }
}

mod wallet {
    use super::*;

    const WALLET: &str = "0xabcdef0123456789abcdef0123456789abcdef01";

    fn wallet_use_case(
        repo: &Arc<InMemoryUsersRepository>,
        cache: &MemoryCache,
    ) -> WalletLinkUseCase<InMemoryUsersRepository, MemoryCache, StubWalletVerifier> {
        WalletLinkUseCase::new(
            repo.clone(),
            cache.clone(),
            Arc::new(StubWalletVerifier),
            config(),
        )
    }

    #[tokio::test]
    async fn full_link_flow() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let cache = MemoryCache::new();
        let user = create_user(&repo, "user@example.com", "strong password 1").await;
        let use_case = wallet_use_case(&repo, &cache);

        let message = use_case.issue_message(&user).await;
        let signature = StubWalletVerifier::expected_signature(WALLET, &message);

        let linked = use_case
            .link(&user, WALLET, &signature)
            .await
            .expect("wallet linked");
        assert_eq!(
            linked.wallet_address.as_ref().map(|w| w.as_str()),
            Some(WALLET)
        );

        // The nonce is one-shot; replaying the same signature fails
        let replay = use_case.link(&user, WALLET, &signature).await;
        assert!(matches!(replay, Err(UsersError::NonceExpired)));
    }

    #[tokio::test]
    async fn rejects_missing_nonce_and_bad_signature() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let cache = MemoryCache::new();
        let user = create_user(&repo, "user@example.com", "strong password 1").await;
        let use_case = wallet_use_case(&repo, &cache);

        // No message issued yet
        let result = use_case.link(&user, WALLET, "signature").await;
        assert!(matches!(result, Err(UsersError::NonceExpired)));

        let _message = use_case.issue_message(&user).await;
        let result = use_case.link(&user, WALLET, "wrong signature").await;
        assert!(matches!(result, Err(UsersError::InvalidSignature)));
    }

    #[tokio::test]
    async fn rejects_wallet_linked_to_another_account() {
        let repo = Arc::new(InMemoryUsersRepository::new());
        let cache = MemoryCache::new();
        let first = create_user(&repo, "first@example.com", "strong password 1").await;
        let second = create_user(&repo, "second@example.com", "strong password 1").await;
        let use_case = wallet_use_case(&repo, &cache);

        let message = use_case.issue_message(&first).await;
        let signature = StubWalletVerifier::expected_signature(WALLET, &message);
        use_case
            .link(&first, WALLET, &signature)
            .await
            .expect("first link succeeds");

        let message = use_case.issue_message(&second).await;
        let signature = StubWalletVerifier::expected_signature(WALLET, &message);
        let result = use_case.link(&second, WALLET, &signature).await;
        assert!(matches!(result, Err(UsersError::WalletTaken)));
    }
}
