//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::config::LedgerConfig;
use crate::domain::chain::Ledger;
use crate::domain::entities::SYSTEM_SENDER;
use crate::domain::services;
use crate::error::{LedgerError, LedgerResult};
use crate::presentation::dto::{
    ChainResponse, MineRequest, MineResponse, NewTransactionRequest, NewTransactionResponse,
    NodeRegisterRequest, NodeRegisterResponse, PendingResponse, TransactionLookupResponse,
    ValidateResponse,
};

/// Shared state for ledger handlers
#[derive(Clone)]
pub struct LedgerAppState {
    pub ledger: Arc<Ledger>,
    pub config: Arc<LedgerConfig>,
}

/// GET /chain
pub async fn get_chain(State(state): State<LedgerAppState>) -> Json<ChainResponse> {
    let chain = state.ledger.chain_snapshot();
    let length = chain.len();
    Json(ChainResponse { chain, length })
}

/// GET /pending
pub async fn get_pending(State(state): State<LedgerAppState>) -> Json<PendingResponse> {
    let pending = state.ledger.pending_snapshot();
    let count = pending.len();
    Json(PendingResponse { pending, count })
}

/// POST /transactions
pub async fn submit_transaction(
    State(state): State<LedgerAppState>,
    Json(req): Json<NewTransactionRequest>,
) -> LedgerResult<impl IntoResponse> {
    let tx_hash = state
        .ledger
        .submit_transaction(&req.sender, &req.recipient, req.amount)?;

    let response = NewTransactionResponse {
        tx_hash,
        pending: state.ledger.pending_len(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /transactions/{tx_hash}
pub async fn find_transaction(
    State(state): State<LedgerAppState>,
    Path(tx_hash): Path<String>,
) -> LedgerResult<Json<TransactionLookupResponse>> {
    let location = state
        .ledger
        .find_transaction(&tx_hash)
        .ok_or(LedgerError::TransactionNotFound)?;

    let status = if location.block_index.is_some() {
        "sealed"
    } else {
        "pending"
    };
    Ok(Json(TransactionLookupResponse {
        transaction: location.transaction,
        block_index: location.block_index,
        status,
    }))
}

/// POST /mine
///
/// Queues a mining reward for the node, validates (or searches for) a proof
/// against the chain tip, then seals.
pub async fn mine(
    State(state): State<LedgerAppState>,
    req: Option<Json<MineRequest>>,
) -> LedgerResult<Json<MineResponse>> {
    let requested_proof = req.and_then(|Json(r)| r.proof);

    let previous_hash = state.ledger.last_block().hash();
    let proof = match requested_proof {
        Some(proof) => {
            if !services::is_valid_proof(&previous_hash, proof, state.config.difficulty_bits) {
                return Err(LedgerError::InvalidProof);
            }
            proof
        }
        None => services::find_proof(&previous_hash, state.config.difficulty_bits),
    };

    state
        .ledger
        .submit_transaction(SYSTEM_SENDER, state.ledger.node_id(), 1)?;

    let block = state
        .ledger
        .seal_block(proof, state.ledger.node_id())
        .ok_or(LedgerError::NothingToSeal)?;

    Ok(Json(MineResponse {
        message: "New block sealed".to_string(),
        block,
    }))
}

/// GET /validate
pub async fn validate_chain(State(state): State<LedgerAppState>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: state.ledger.validate(),
        length: state.ledger.chain_snapshot().len(),
    })
}

/// POST /nodes/register
pub async fn register_nodes(
    State(state): State<LedgerAppState>,
    Json(req): Json<NodeRegisterRequest>,
) -> Json<NodeRegisterResponse> {
    let total_nodes = state.ledger.register_nodes(&req.nodes);
    Json(NodeRegisterResponse {
        message: "New nodes have been added".to_string(),
        total_nodes,
    })
}
