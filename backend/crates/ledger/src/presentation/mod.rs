//! Presentation Layer
//!
//! HTTP interface for the ledger.

pub mod dto;
pub mod handlers;
pub mod router;
