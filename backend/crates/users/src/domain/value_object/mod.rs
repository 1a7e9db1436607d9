//! Domain Value Objects

pub mod email;
pub mod public_id;
pub mod user_role;
pub mod wallet_address;
