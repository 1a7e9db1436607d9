//! Unit tests for the ledger crate

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::config::LedgerConfig;
use crate::domain::chain::Ledger;

fn ledger() -> Ledger {
    Ledger::new("test-node")
}

mod sealing {
    use super::*;

    #[test]
    fn seal_moves_all_pending_and_empties_pool() {
        let ledger = ledger();
        ledger.submit_transaction("alice", "bob", 5).unwrap();
        ledger.submit_transaction("bob", "carol", 7).unwrap();

        let block = ledger.seal_block(42, "test-node").expect("block sealed");

        assert_eq!(block.transactions.len(), 2);
        let amounts: Vec<u64> = block.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![5, 7]);
        assert_eq!(ledger.pending_len(), 0);
        assert_eq!(ledger.chain_snapshot().len(), 2);
    }

    #[test]
    fn sealing_empty_pool_is_a_noop() {
        let ledger = ledger();
        assert!(ledger.seal_block(42, "test-node").is_none());
        assert_eq!(ledger.chain_snapshot().len(), 1);
    }

    #[test]
    fn previous_hash_links_to_prior_block() {
        let ledger = ledger();

        ledger.submit_transaction("alice", "bob", 1).unwrap();
        let genesis_hash = ledger.last_block().hash();
        let first = ledger.seal_block(7, "test-node").unwrap();
        assert_eq!(first.previous_hash, genesis_hash);

        ledger.submit_transaction("bob", "alice", 2).unwrap();
        let second = ledger.seal_block(8, "test-node").unwrap();
        assert_eq!(second.previous_hash, first.hash());

        assert!(ledger.validate());
    }

    #[test]
    fn n_seals_produce_n_plus_one_blocks() {
        let ledger = ledger();
        let seals = 10;
        for i in 0..seals {
            ledger.submit_transaction("alice", "bob", i + 1).unwrap();
            assert!(ledger.seal_block(i, "test-node").is_some());
        }
        let chain = ledger.chain_snapshot();
        assert_eq!(chain.len(), (seals + 1) as usize);
        // Indexes are sequential starting from the genesis block
        for (position, block) in chain.iter().enumerate() {
            assert_eq!(block.index, position as u64 + 1);
        }
    }

    #[test]
    fn threshold_seal_only_fires_at_threshold() {
        let ledger = ledger();
        let config = LedgerConfig::default();

        for i in 0..config.block_threshold - 1 {
            ledger
                .submit_transaction("alice", "bob", i as u64 + 1)
                .unwrap();
            assert!(
                ledger
                    .seal_if_threshold(config.block_threshold, 42, "test-node")
                    .is_none()
            );
        }

        ledger.submit_transaction("alice", "bob", 99).unwrap();
        let block = ledger
            .seal_if_threshold(config.block_threshold, 42, "test-node")
            .expect("threshold reached");
        assert_eq!(block.transactions.len(), config.block_threshold);
        assert_eq!(ledger.pending_len(), 0);
    }
}

mod transactions {
    use super::*;

    #[test]
    fn rejects_zero_amount() {
        let ledger = ledger();
        assert!(ledger.submit_transaction("alice", "bob", 0).is_err());
        assert_eq!(ledger.pending_len(), 0);
    }

    #[test]
    fn find_transaction_in_pending_then_sealed() {
        let ledger = ledger();
        let tx_hash = ledger.submit_transaction("alice", "bob", 10).unwrap();

        let location = ledger.find_transaction(&tx_hash).expect("found pending");
        assert!(location.block_index.is_none());

        let block = ledger.seal_block(42, "test-node").unwrap();
        let location = ledger.find_transaction(&tx_hash).expect("found sealed");
        assert_eq!(location.block_index, Some(block.index));
        assert_eq!(location.transaction.amount, 10);

        assert!(ledger.find_transaction("no-such-hash").is_none());
    }
}

mod concurrency {
    use super::*;

    /// Two sealers racing over one pool must neither double-seal a
    /// transaction nor drop one.
    #[test]
    fn concurrent_sealers_cover_every_transaction_exactly_once() {
        let ledger = Arc::new(ledger());
        let total = 200u64;

        let submitter = {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for i in 1..=total {
                    ledger.submit_transaction("alice", "bob", i).unwrap();
                }
            })
        };

        // One "threshold" sealer and one "timer" sealer
        let sealers: Vec<_> = (0..2)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        ledger.seal_block(42, "racer");
                        std::thread::yield_now();
                    }
                })
            })
            .collect();

        submitter.join().unwrap();
        for sealer in sealers {
            sealer.join().unwrap();
        }
        // Sweep up anything still pending
        ledger.seal_block(42, "sweeper");

        let chain = ledger.chain_snapshot();
        let mut seen = HashSet::new();
        let mut amounts: Vec<u64> = Vec::new();
        for block in &chain {
            for tx in &block.transactions {
                assert!(seen.insert(tx.tx_hash.clone()), "transaction sealed twice");
                amounts.push(tx.amount);
            }
        }
        assert_eq!(amounts.len() as u64, total, "transaction dropped");
        assert_eq!(ledger.pending_len(), 0);
        assert!(ledger.validate());
    }
}

mod nodes {
    use super::*;

    #[test]
    fn register_nodes_deduplicates_and_skips_garbage() {
        let ledger = ledger();
        let registered = ledger.register_nodes(&[
            "http://192.168.0.5:5001".to_string(),
            "192.168.0.5:5001".to_string(),
            "".to_string(),
        ]);
        assert_eq!(registered, vec!["192.168.0.5:5001".to_string()]);
        assert_eq!(ledger.nodes(), vec!["192.168.0.5:5001".to_string()]);
    }
}
