//! Users Error Types
//!
//! User-domain error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Users-specific result type alias
pub type UsersResult<T> = Result<T, UsersError>;

/// Users-specific error variants
#[derive(Debug, Error)]
pub enum UsersError {
    /// Email already registered
    #[error("A user with this email already exists")]
    EmailTaken,

    /// Wrong email or password; deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is inside a ban window
    #[error("Account is temporarily blocked until {until} UTC")]
    AccountBanned { until: String },

    /// No such user
    #[error("User not found")]
    UserNotFound,

    /// Caller lacks the required role or ownership
    #[error("Not allowed to perform this action")]
    PermissionDenied,

    /// Admins cannot ban each other
    #[error("Another administrator cannot be blocked")]
    CannotBlockAdmin,

    /// Wallet already linked elsewhere
    #[error("This wallet is already linked to another account")]
    WalletTaken,

    /// One-shot signing nonce missing or expired
    #[error("The signing window has expired. Request a new message")]
    NonceExpired,

    /// Wallet signature failed verification
    #[error("Signature is not valid")]
    InvalidSignature,

    /// Input validation failure
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UsersError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersError::EmailTaken => ErrorKind::BadRequest,
            UsersError::InvalidCredentials => ErrorKind::Unauthorized,
            UsersError::AccountBanned { .. } => ErrorKind::Forbidden,
            UsersError::UserNotFound => ErrorKind::NotFound,
            UsersError::PermissionDenied => ErrorKind::Forbidden,
            UsersError::CannotBlockAdmin => ErrorKind::Forbidden,
            UsersError::WalletTaken => ErrorKind::Conflict,
            UsersError::NonceExpired => ErrorKind::RequestTimeout,
            UsersError::InvalidSignature => ErrorKind::BadRequest,
            UsersError::Validation(_) => ErrorKind::BadRequest,
            UsersError::Database(_) | UsersError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with the appropriate level
    fn log(&self) {
        match self {
            UsersError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UsersError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
            UsersError::InvalidCredentials | UsersError::InvalidSignature => {
                tracing::warn!(error = %self, "Rejected credential check");
            }
            _ => {
                tracing::debug!(error = %self, "Users error");
            }
        }
    }
}

impl From<PasswordPolicyError> for UsersError {
    fn from(err: PasswordPolicyError) -> Self {
        UsersError::Validation(err.to_string())
    }
}

impl From<PasswordHashError> for UsersError {
    fn from(err: PasswordHashError) -> Self {
        UsersError::Internal(err.to_string())
    }
}

impl From<UsersError> for AppError {
    fn from(err: UsersError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
