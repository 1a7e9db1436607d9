//! Chain Aggregate
//!
//! The shared ledger state: pending transaction pool, append-only chain,
//! and the peer-node address book. Request handlers and the periodic sealer
//! both mutate this state, so the pool and the chain sit behind a single
//! `Mutex`. The lock is only taken inside synchronous methods and is never
//! held across an await point.

use std::collections::BTreeSet;
use std::sync::Mutex;

use url::Url;

use crate::domain::entities::{Block, Transaction};
use crate::error::{LedgerError, LedgerResult};

/// Where a transaction was found by [`Ledger::find_transaction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLocation {
    pub transaction: Transaction,
    /// Index of the sealed block, `None` while still pending
    pub block_index: Option<u64>,
}

#[derive(Debug)]
struct ChainState {
    pending: Vec<Transaction>,
    blocks: Vec<Block>,
}

/// The in-process ledger
#[derive(Debug)]
pub struct Ledger {
    node_id: String,
    state: Mutex<ChainState>,
    nodes: Mutex<BTreeSet<String>>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            state: Mutex::new(ChainState {
                pending: Vec::new(),
                blocks: vec![Block::genesis()],
            }),
            nodes: Mutex::new(BTreeSet::new()),
        }
    }

    /// Identifier of this node, used as the default miner
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Append a transfer to the pending pool
    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
    ) -> LedgerResult<String> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let transaction = Transaction::new(sender, recipient, amount);
        let tx_hash = transaction.tx_hash.clone();

        let mut state = self.lock_state();
        state.pending.push(transaction);
        let pending = state.pending.len();
        drop(state);

        tracing::debug!(tx_hash = %tx_hash, pending, "Transaction queued");
        Ok(tx_hash)
    }

    /// Seal every pending transaction into a new block
    ///
    /// Returns `None` when the pool is empty; the chain is never extended
    /// with an empty block.
    pub fn seal_block(&self, proof: u64, miner: &str) -> Option<Block> {
        let mut state = self.lock_state();
        Self::seal_locked(&mut state, proof, miner)
    }

    /// Seal only when the pool has reached `threshold` transactions
    ///
    /// The check and the seal happen under one lock acquisition, so two
    /// racing callers cannot both observe the same pending set.
    pub fn seal_if_threshold(&self, threshold: usize, proof: u64, miner: &str) -> Option<Block> {
        let mut state = self.lock_state();
        if state.pending.len() < threshold {
            return None;
        }
        Self::seal_locked(&mut state, proof, miner)
    }

    fn seal_locked(state: &mut ChainState, proof: u64, miner: &str) -> Option<Block> {
        if state.pending.is_empty() {
            return None;
        }
        let last = state
            .blocks
            .last()
            .expect("chain always contains the genesis block");
        let block = Block {
            index: last.index + 1,
            timestamp: chrono::Utc::now(),
            transactions: std::mem::take(&mut state.pending),
            proof,
            previous_hash: last.hash(),
            miner: miner.to_string(),
        };
        state.blocks.push(block.clone());

        tracing::info!(
            index = block.index,
            transactions = block.transactions.len(),
            miner = %block.miner,
            "Block sealed"
        );
        Some(block)
    }

    /// Number of transactions waiting to be sealed
    pub fn pending_len(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Snapshot of the pending pool
    pub fn pending_snapshot(&self) -> Vec<Transaction> {
        self.lock_state().pending.clone()
    }

    /// Snapshot of the whole chain
    pub fn chain_snapshot(&self) -> Vec<Block> {
        self.lock_state().blocks.clone()
    }

    /// The chain tip
    pub fn last_block(&self) -> Block {
        self.lock_state()
            .blocks
            .last()
            .expect("chain always contains the genesis block")
            .clone()
    }

    /// Locate a transaction by hash, sealed blocks first, then the pool
    pub fn find_transaction(&self, tx_hash: &str) -> Option<TransactionLocation> {
        let state = self.lock_state();
        for block in &state.blocks {
            if let Some(transaction) = block.transactions.iter().find(|t| t.tx_hash == tx_hash) {
                return Some(TransactionLocation {
                    transaction: transaction.clone(),
                    block_index: Some(block.index),
                });
            }
        }
        state
            .pending
            .iter()
            .find(|t| t.tx_hash == tx_hash)
            .map(|transaction| TransactionLocation {
                transaction: transaction.clone(),
                block_index: None,
            })
    }

    /// Walk the chain and check every previous-hash link
    pub fn validate(&self) -> bool {
        let state = self.lock_state();
        state
            .blocks
            .windows(2)
            .all(|pair| pair[1].previous_hash == pair[0].hash())
    }

    /// Register peer node addresses
    ///
    /// Accepts full URLs and bare `host:port` strings; unparsable entries
    /// are skipped with a warning. The address book is bookkeeping only;
    /// no traffic is ever sent.
    pub fn register_nodes(&self, urls: &[String]) -> Vec<String> {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        for raw in urls {
            match parse_node_address(raw) {
                Some(address) => {
                    nodes.insert(address);
                }
                None => {
                    tracing::warn!(node = %raw, "Skipping unparsable node address");
                }
            }
        }
        nodes.iter().cloned().collect()
    }

    /// Known peer node addresses
    pub fn nodes(&self) -> Vec<String> {
        self.nodes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ChainState> {
        // A poisoned lock only means another thread panicked mid-seal;
        // the state itself is still structurally sound.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_node_address(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw)
        .ok()
        .filter(|url| url.has_host())
        .or_else(|| Url::parse(&format!("http://{}", raw)).ok())?;

    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_address_forms() {
        assert_eq!(
            parse_node_address("http://192.168.0.5:5001"),
            Some("192.168.0.5:5001".to_string())
        );
        assert_eq!(
            parse_node_address("192.168.0.5:5001"),
            Some("192.168.0.5:5001".to_string())
        );
        assert_eq!(
            parse_node_address("https://node.example.com"),
            Some("node.example.com".to_string())
        );
        assert_eq!(parse_node_address(""), None);
    }
}
