//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Block, Transaction};

/// New transaction request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionRequest {
    /// "0" marks a system transaction (e.g. a mining reward)
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

/// New transaction response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionResponse {
    pub tx_hash: String,
    pub pending: usize,
}

/// Full chain response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Pending pool response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResponse {
    pub pending: Vec<Transaction>,
    pub count: usize,
}

/// Mine request; with no proof supplied the node searches for one
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineRequest {
    pub proof: Option<u64>,
}

/// Mine response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineResponse {
    pub message: String,
    pub block: Block,
}

/// Transaction lookup response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLookupResponse {
    pub transaction: Transaction,
    /// Index of the sealed block, absent while the transaction is pending
    pub block_index: Option<u64>,
    pub status: &'static str,
}

/// Chain validation response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/// Node registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegisterRequest {
    pub nodes: Vec<String>,
}

/// Node registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegisterResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}
