//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Expiring key-value cache (memoized reads, short-lived nonces)

pub mod cache;
pub mod crypto;
pub mod password;
