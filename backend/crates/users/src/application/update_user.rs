//! Update User Use Case
//!
//! A user may update their own profile; administrators may update anyone.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};
use serde_json::Value;

use crate::application::config::UsersConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UsersError, UsersResult};

/// Update user input; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub language: Option<String>,
    pub preferences: Option<Value>,
    pub password: Option<String>,
}

/// Update User Use Case
pub struct UpdateUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> UpdateUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        acting_user: &User,
        target_public_id: &str,
        input: UpdateUserInput,
    ) -> UsersResult<User> {
        let mut target = self
            .repo
            .find_by_public_id(target_public_id)
            .await?
            .ok_or(UsersError::UserNotFound)?;

        // Owner or admin only
        if acting_user.user_id != target.user_id && !acting_user.role.is_admin() {
            return Err(UsersError::PermissionDenied);
        }

        if let Some(language) = input.language {
            target.set_language(language);
        }
        if let Some(preferences) = input.preferences {
            if !preferences.is_object() {
                return Err(UsersError::Validation(
                    "Preferences must be a JSON object".to_string(),
                ));
            }
            target.set_preferences(preferences);
        }
        if let Some(password) = input.password {
            let clear_text = ClearTextPassword::new(password)?;
            let hashed = HashedPassword::from_clear_text(&clear_text, self.config.pepper())?;
            target.set_password_hash(hashed.into_string());
        }

        self.repo.update(&target).await?;
        Ok(target)
    }
}
