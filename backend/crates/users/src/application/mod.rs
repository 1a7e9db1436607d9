//! Application Layer - Use Cases

pub mod config;
pub mod create_user;
pub mod login;
pub mod moderation;
pub mod update_user;
pub mod wallet_link;

pub use create_user::{CreateUserInput, CreateUserUseCase};
pub use login::{LoginInput, LoginUseCase};
pub use moderation::ModerationUseCase;
pub use update_user::{UpdateUserInput, UpdateUserUseCase};
pub use wallet_link::WalletLinkUseCase;
