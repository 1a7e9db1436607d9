//! Wallet Signature Verification Port
//!
//! The production implementation talks to an external blockchain client
//! library; this backend only consumes the boundary.

/// Wallet signature verifier trait
#[trait_variant::make(WalletVerifier: Send)]
pub trait LocalWalletVerifier {
    /// Check that `signature` was produced over `message` by the owner of
    /// `wallet_address`
    async fn verify(&self, wallet_address: &str, message: &str, signature: &str) -> bool;
}
