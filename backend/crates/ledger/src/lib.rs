//! Ledger - In-Process Blockchain Simulation
//!
//! Clean Architecture structure:
//! - `domain/` - Transactions, blocks, the chain aggregate, proof services
//! - `application/` - Configuration and the periodic sealing task
//! - `presentation/` - HTTP handlers
//!
//! ## Model
//! - Pending transactions and the block chain live in process memory only;
//!   nothing survives a restart and nothing reconciles with an external
//!   network
//! - All mutation of the pending pool and the chain goes through one
//!   exclusive lock, so the threshold-triggered and timer-triggered sealing
//!   paths cannot double-seal or drop a transaction
//! - Proof values are validated against a configurable leading-zero-bits
//!   difficulty; this is a simulation knob, not consensus

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LedgerConfig;
pub use application::sealer::run_periodic_sealer;
pub use domain::chain::Ledger;
pub use domain::entities::{Block, SYSTEM_SENDER, Transaction};
pub use error::{LedgerError, LedgerResult};
pub use presentation::router::ledger_router;

#[cfg(test)]
mod tests;
