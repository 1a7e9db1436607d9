//! Domain Entities
//!
//! Transactions and blocks of the in-process ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender address used for system transactions (mining rewards, baraka
/// point awards)
pub const SYSTEM_SENDER: &str = "0";

/// A baraka-point transfer between two addresses
///
/// Transient while in the pending pool; immutable once sealed into a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    /// Strictly positive; validated before the transaction enters the pool
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
    /// SHA-256 hex over the transaction fields plus a random salt
    pub tx_hash: String,
}

impl Transaction {
    /// Create a new transaction with a fresh hash
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        let sender = sender.into();
        let recipient = recipient.into();
        let timestamp = Utc::now();
        // Random salt keeps hashes unique for identical transfers
        let salt = Uuid::new_v4();
        let tx_hash = platform::crypto::sha256_hex(
            format!(
                "{}:{}:{}:{}:{}",
                sender,
                recipient,
                amount,
                timestamp.timestamp_nanos_opt().unwrap_or_default(),
                salt
            )
            .as_bytes(),
        );

        Self {
            sender,
            recipient,
            amount,
            timestamp,
            tx_hash,
        }
    }
}

/// One sealed block of the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// 1-indexed position in the chain
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    /// Caller-supplied proof value
    pub proof: u64,
    /// SHA-256 hex of the previous block ("1" for genesis)
    pub previous_hash: String,
    /// Node identifier that sealed the block
    pub miner: String,
}

impl Block {
    /// The fixed first block every chain starts from
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: Utc::now(),
            transactions: Vec::new(),
            proof: 100,
            previous_hash: "1".to_string(),
            miner: SYSTEM_SENDER.to_string(),
        }
    }

    /// SHA-256 hex over the serialized block
    pub fn hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        platform::crypto::sha256_hex(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_hashes_are_unique() {
        let a = Transaction::new("alice", "bob", 10);
        let b = Transaction::new("alice", "bob", 10);
        assert_ne!(a.tx_hash, b.tx_hash);
        assert_eq!(a.tx_hash.len(), 64);
    }

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::genesis();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "1");
        assert_eq!(genesis.proof, 100);
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn test_block_hash_is_stable() {
        let block = Block::genesis();
        assert_eq!(block.hash(), block.hash());
    }

    #[test]
    fn test_block_hash_depends_on_contents() {
        let block = Block::genesis();
        let mut other = block.clone();
        other.proof = 101;
        assert_ne!(block.hash(), other.hash());
    }
}
