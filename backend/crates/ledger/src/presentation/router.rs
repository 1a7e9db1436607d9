//! Ledger Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::LedgerConfig;
use crate::domain::chain::Ledger;
use crate::presentation::handlers::{self, LedgerAppState};

/// Create the ledger router
pub fn ledger_router(ledger: Arc<Ledger>, config: LedgerConfig) -> Router {
    let state = LedgerAppState {
        ledger,
        config: Arc::new(config),
    };

    Router::new()
        .route("/chain", get(handlers::get_chain))
        .route("/pending", get(handlers::get_pending))
        .route("/validate", get(handlers::validate_chain))
        .route("/transactions", post(handlers::submit_transaction))
        .route("/transactions/{tx_hash}", get(handlers::find_transaction))
        .route("/mine", post(handlers::mine))
        .route("/nodes/register", post(handlers::register_nodes))
        .with_state(state)
}
