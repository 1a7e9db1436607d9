//! Create User Use Case

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::UsersConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{UsersError, UsersResult};

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub language: Option<String>,
}

/// Create User Use Case
pub struct CreateUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> CreateUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: CreateUserInput) -> UsersResult<User> {
        let email = Email::new(input.email)?;

        if self.repo.find_by_email(email.as_str()).await?.is_some() {
            return Err(UsersError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = HashedPassword::from_clear_text(&password, self.config.pepper())?;

        let api_key = generate_api_key(self.config.api_key_bytes);
        let language = input
            .language
            .unwrap_or_else(|| self.config.default_language.clone());

        let user = User::new(email, password_hash.into_string(), api_key, language);
        self.repo.create(&user).await?;

        tracing::info!(
            public_id = %user.public_id,
            "User created"
        );

        Ok(user)
    }
}

/// Opaque API key: hex digest of fresh OS randomness
pub(crate) fn generate_api_key(bytes: usize) -> String {
    platform::crypto::sha256_hex(&platform::crypto::random_bytes(bytes))
}
