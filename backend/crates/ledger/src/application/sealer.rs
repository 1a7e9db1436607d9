//! Periodic Sealing Task
//!
//! Background task that seals pending transactions on a fixed interval.
//! It shares the chain mutex with the threshold-triggered path in the
//! request dispatcher, so the two can never double-seal.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;

use crate::application::config::LedgerConfig;
use crate::domain::chain::Ledger;

/// Run the periodic sealer until the task is dropped
pub async fn run_periodic_sealer(ledger: Arc<Ledger>, config: LedgerConfig) {
    let mut interval = tokio::time::interval(config.seal_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so startup does not seal
    interval.tick().await;

    loop {
        interval.tick().await;
        let proof = config.random_proof();
        match ledger.seal_block(proof, ledger.node_id()) {
            Some(block) => {
                tracing::info!(
                    index = block.index,
                    transactions = block.transactions.len(),
                    "Periodic task sealed a block"
                );
            }
            None => {
                tracing::debug!("Periodic task: no pending transactions, no block sealed");
            }
        }
    }
}
