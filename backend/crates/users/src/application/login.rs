//! Login Use Case

use std::sync::Arc;

use chrono::Utc;
use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::UsersConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UsersError, UsersResult};

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub public_id: String,
    pub api_key: String,
    pub role: String,
}

/// Login Use Case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> UsersResult<LoginOutput> {
        let email = input.email.trim().to_lowercase();
        let mut user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(UsersError::InvalidCredentials)?;

        let now = Utc::now();
        if user.is_banned(now) {
            let until = user
                .banned_until
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            return Err(UsersError::AccountBanned { until });
        }

        if !verify_password(&user, &input.password, self.config.pepper()) {
            return Err(UsersError::InvalidCredentials);
        }

        user.record_login();
        self.repo.update(&user).await?;

        tracing::info!(public_id = %user.public_id, "User logged in");

        Ok(LoginOutput {
            public_id: user.public_id.to_string(),
            api_key: user.api_key,
            role: user.role.code().to_string(),
        })
    }
}

fn verify_password(user: &User, password: &str, pepper: Option<&str>) -> bool {
    let Ok(clear_text) = ClearTextPassword::new(password.to_string()) else {
        return false;
    };
    let Ok(hashed) = HashedPassword::from_phc_string(user.password_hash.clone()) else {
        return false;
    };
    hashed.verify(&clear_text, pepper)
}
