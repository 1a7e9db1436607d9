//! Module Error Types
//!
//! Two families matter to the dispatcher: cooperative domain failures
//! (reported to the caller, transaction rolled back) and infrastructure
//! faults (logged, rolled back, surfaced as a generic internal error).

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Module-specific result type alias
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Module-specific error variants
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Cooperative failure a module reports to the caller
    #[error("{0}")]
    Domain(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Payload (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ModuleError {
    /// Shorthand for a cooperative failure
    pub fn domain(message: impl Into<String>) -> Self {
        ModuleError::Domain(message.into())
    }

    /// Whether the error is a cooperative failure whose text may reach the
    /// caller; everything else collapses into a generic internal error
    pub fn is_domain(&self) -> bool {
        matches!(self, ModuleError::Domain(_))
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        if self.is_domain() {
            ErrorKind::BadRequest
        } else {
            ErrorKind::InternalServerError
        }
    }

    fn log(&self) {
        match self {
            ModuleError::Database(e) => {
                tracing::error!(error = %e, "Module database error");
            }
            ModuleError::Internal(msg) => {
                tracing::error!(message = %msg, "Module internal error");
            }
            ModuleError::Serialization(e) => {
                tracing::error!(error = %e, "Module serialization error");
            }
            _ => {
                tracing::debug!(error = %self, "Module domain error");
            }
        }
    }
}

impl From<ModuleError> for AppError {
    fn from(err: ModuleError) -> Self {
        if err.is_domain() {
            AppError::new(err.kind(), err.to_string())
        } else {
            AppError::internal("Internal server error")
        }
    }
}

impl IntoResponse for ModuleError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
