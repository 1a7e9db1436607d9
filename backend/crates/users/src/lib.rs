//! Users Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository and verifier traits
//! - `application/` - Use cases
//! - `infra/` - Database implementation, wallet verifier stub
//! - `presentation/` - HTTP handlers, DTOs, router, auth middleware
//!
//! ## Features
//! - Registration with email + password, API-key issuance
//! - Login with temporary-ban enforcement
//! - Admin moderation (list, block, unblock, delete)
//! - Wallet linking with a one-shot cache-backed nonce
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Requests authenticated with opaque API keys, not JWTs
//! - Wallet signatures verified through a pluggable port; the production
//!   verifier is an external blockchain client library

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UsersConfig;
pub use domain::entity::User;
pub use domain::repository::UserRepository;
pub use error::{UsersError, UsersResult};
pub use infra::postgres::PgUsersRepository;
pub use infra::wallet_stub::StubWalletVerifier;
pub use presentation::middleware::CurrentUser;
pub use presentation::router::users_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
