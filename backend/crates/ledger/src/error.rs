//! Ledger Error Types
//!
//! Ledger-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Ledger-specific result type alias
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-specific error variants
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transfer amount must be strictly positive
    #[error("Transaction amount must be a positive number")]
    InvalidAmount,

    /// No transaction with the requested hash, sealed or pending
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Supplied proof does not meet the difficulty requirement
    #[error("Proof does not meet the difficulty requirement")]
    InvalidProof,

    /// Nothing to seal
    #[error("No pending transactions to seal")]
    NothingToSeal,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount => ErrorKind::UnprocessableEntity,
            LedgerError::TransactionNotFound => ErrorKind::NotFound,
            LedgerError::InvalidProof => ErrorKind::Conflict,
            LedgerError::NothingToSeal => ErrorKind::Conflict,
            LedgerError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with the appropriate level
    fn log(&self) {
        match self {
            LedgerError::Internal(msg) => {
                tracing::error!(message = %msg, "Ledger internal error");
            }
            LedgerError::InvalidProof => {
                tracing::warn!("Rejected seal with invalid proof");
            }
            _ => {
                tracing::debug!(error = %self, "Ledger error");
            }
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
