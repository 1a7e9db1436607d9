//! Ledger Configuration

use std::time::Duration;

use rand::Rng;

/// Ledger application configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Pending-pool size that triggers a seal after a dispatched request
    pub block_threshold: usize,
    /// Interval of the background sealing task
    pub seal_interval: Duration,
    /// Difficulty in leading zero bits for caller-supplied proofs
    pub difficulty_bits: u8,
    /// Upper bound for internally generated proof values
    pub max_proof: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            block_threshold: 5,
            seal_interval: Duration::from_secs(600),
            difficulty_bits: 8,
            max_proof: 100_000,
        }
    }
}

impl LedgerConfig {
    /// Short interval and low difficulty for local development
    pub fn development() -> Self {
        Self {
            seal_interval: Duration::from_secs(30),
            ..Self::default()
        }
    }

    /// A random proof for internally triggered seals
    ///
    /// Internally triggered seals do not mine; they stamp the block with an
    /// arbitrary proof, as the original system did.
    pub fn random_proof(&self) -> u64 {
        rand::rng().random_range(1..=self.max_proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.block_threshold, 5);
        assert_eq!(config.seal_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_random_proof_in_range() {
        let config = LedgerConfig::default();
        for _ in 0..100 {
            let proof = config.random_proof();
            assert!((1..=config.max_proof).contains(&proof));
        }
    }
}
