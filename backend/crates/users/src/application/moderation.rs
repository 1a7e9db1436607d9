//! Moderation Use Cases
//!
//! Admin-only operations: temporary blocking, unblocking, deletion.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UsersError, UsersResult};

/// Moderation Use Case
pub struct ModerationUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ModerationUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Temporarily block a user
    pub async fn block(
        &self,
        admin: &User,
        target_public_id: &str,
        duration_secs: i64,
    ) -> UsersResult<User> {
        if !admin.role.is_admin() {
            return Err(UsersError::PermissionDenied);
        }
        if duration_secs <= 0 {
            return Err(UsersError::Validation(
                "Block duration must be positive".to_string(),
            ));
        }

        let mut target = self
            .repo
            .find_by_public_id(target_public_id)
            .await?
            .ok_or(UsersError::UserNotFound)?;

        // Admins cannot ban each other
        if target.role.is_admin() {
            return Err(UsersError::CannotBlockAdmin);
        }

        let until = Utc::now() + Duration::seconds(duration_secs);
        target.ban_until(until);
        self.repo.update(&target).await?;

        tracing::info!(
            admin = %admin.public_id,
            target = %target.public_id,
            duration_secs,
            "ADMIN ACTION: user blocked"
        );
        Ok(target)
    }

    /// Lift a block
    pub async fn unblock(&self, admin: &User, target_public_id: &str) -> UsersResult<User> {
        if !admin.role.is_admin() {
            return Err(UsersError::PermissionDenied);
        }

        let mut target = self
            .repo
            .find_by_public_id(target_public_id)
            .await?
            .ok_or(UsersError::UserNotFound)?;

        target.lift_ban();
        self.repo.update(&target).await?;

        tracing::info!(
            admin = %admin.public_id,
            target = %target.public_id,
            "ADMIN ACTION: user unblocked"
        );
        Ok(target)
    }

    /// Delete a user permanently
    pub async fn delete(&self, admin: &User, target_public_id: &str) -> UsersResult<()> {
        if !admin.role.is_admin() {
            return Err(UsersError::PermissionDenied);
        }

        let target = self
            .repo
            .find_by_public_id(target_public_id)
            .await?
            .ok_or(UsersError::UserNotFound)?;

        self.repo.delete(&target.user_id).await?;

        tracing::info!(
            admin = %admin.public_id,
            target = %target.public_id,
            "ADMIN ACTION: user deleted"
        );
        Ok(())
    }
}
