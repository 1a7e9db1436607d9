//! Wallet Verifier Stub
//!
//! Stand-in for the external blockchain client library that recovers a
//! signer address from a signature. Deterministic so the linking flow can
//! be exercised end to end: a "signature" is the SHA-256 hex of
//! `{wallet_address}:{message}`.

use crate::domain::verifier::WalletVerifier;

/// Deterministic verifier stub
#[derive(Debug, Clone, Copy, Default)]
pub struct StubWalletVerifier;

impl StubWalletVerifier {
    /// The signature the stub expects; handy for tests and local clients
    pub fn expected_signature(wallet_address: &str, message: &str) -> String {
        platform::crypto::sha256_hex(format!("{}:{}", wallet_address, message).as_bytes())
    }
}

impl WalletVerifier for StubWalletVerifier {
    async fn verify(&self, wallet_address: &str, message: &str, signature: &str) -> bool {
        let expected = Self::expected_signature(wallet_address, message);
        platform::crypto::constant_time_eq(expected.as_bytes(), signature.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_expected_signature_only() {
        let verifier = StubWalletVerifier;
        let wallet = "0xabcdef0123456789abcdef0123456789abcdef01";
        let message = "I am linking this wallet. Nonce: abc";

        let signature = StubWalletVerifier::expected_signature(wallet, message);
        assert!(verifier.verify(wallet, message, &signature).await);
        assert!(!verifier.verify(wallet, message, "bogus").await);
        assert!(!verifier.verify(wallet, "other message", &signature).await);
    }
}
