//! Request Dispatcher
//!
//! The single entry point the HTTP layer calls for module work. The
//! dispatcher resolves the target module from the envelope's module tag,
//! owns the per-request database transaction, reconciles the outcome with
//! the in-process ledger, and attaches secondary recommendations.
//!
//! Faults never propagate: every path collapses into a
//! [`DispatchResponse`], and the HTTP layer decides the status code.

use std::sync::Arc;

use ledger::{Ledger, LedgerConfig};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use users::User;

use crate::domain::contract::{DomainModule, ModuleKind, ModuleReply, UserRef};
use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::Recommendation;
use crate::error::ModuleResult;
use crate::recommendations::RecommendationEngine;
use crate::registry::ModuleRegistry;

/// Result of one dispatched request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub success: bool,
    /// Module-specific response payload
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub additional_recommendations: Vec<Recommendation>,
}

impl DispatchResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
            additional_recommendations: Vec::new(),
        }
    }
}

/// The request dispatcher
pub struct Dispatcher {
    pool: PgPool,
    registry: Arc<ModuleRegistry>,
    ledger: Arc<Ledger>,
    ledger_config: LedgerConfig,
    recommendations: RecommendationEngine,
}

impl Dispatcher {
    pub fn new(
        pool: PgPool,
        registry: Arc<ModuleRegistry>,
        ledger: Arc<Ledger>,
        ledger_config: LedgerConfig,
    ) -> Self {
        Self {
            pool,
            registry,
            ledger,
            ledger_config,
            recommendations: RecommendationEngine::new(),
        }
    }

    /// Process one request envelope on behalf of `actor`
    ///
    /// `None` is the anonymous caller used by public operations. An unknown
    /// module tag fails before any database work; an absent tag falls back
    /// to the prayer assistant.
    pub async fn process_request(
        &self,
        actor: Option<&User>,
        mut envelope: RequestEnvelope,
    ) -> DispatchResponse {
        let kind = match envelope.module.as_deref() {
            Some(tag) => match ModuleKind::from_tag(tag) {
                Some(kind) => kind,
                None => {
                    tracing::warn!(module = %tag, "Requested module does not exist");
                    return DispatchResponse::failure("Module not found");
                }
            },
            None => ModuleKind::FALLBACK,
        };
        let Some(module) = self.registry.get(kind) else {
            tracing::warn!(module = %kind, "Module is not registered");
            return DispatchResponse::failure("Module not found");
        };

        let actor_ref = actor.map(|user| UserRef {
            user_id: user.user_id,
            public_id: user.public_id.as_str().to_string(),
            language: user.language.clone(),
        });
        if let Some(actor_ref) = &actor_ref {
            envelope.user_language = Some(actor_ref.language.clone());
        }

        tracing::info!(module = %kind, op = %envelope.op, "Dispatching request");

        match self.delegate(module.as_ref(), actor_ref.as_ref(), &envelope).await {
            Ok(reply) => {
                self.record_awards(&reply);
                self.seal_on_threshold();

                let additional_recommendations =
                    self.recommendations.generate(kind, &envelope.op, &reply.data);
                DispatchResponse {
                    success: true,
                    data: reply.data,
                    error: None,
                    additional_recommendations,
                }
            }
            Err(err) if err.is_domain() => DispatchResponse::failure(err.to_string()),
            Err(err) => {
                tracing::error!(
                    module = %kind,
                    op = %envelope.op,
                    error = %err,
                    "Unexpected fault while dispatching request"
                );
                DispatchResponse::failure("An internal server error occurred")
            }
        }
    }

    /// Run the module handler inside its own transaction
    ///
    /// Commit happens exactly once, on handler success; every other exit
    /// path rolls back.
    async fn delegate(
        &self,
        module: &dyn DomainModule,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
    ) -> ModuleResult<ModuleReply> {
        let mut tx = self.pool.begin().await?;

        match module.handle(actor, envelope, &mut tx).await {
            Ok(reply) => {
                tx.commit().await?;
                Ok(reply)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Queue the reply's baraka transfers on the ledger
    ///
    /// Awards are recorded only after the commit, so a rolled-back request
    /// leaves no trace on the chain either.
    fn record_awards(&self, reply: &ModuleReply) {
        for award in &reply.ledger_awards {
            if let Err(err) =
                self.ledger
                    .submit_transaction(&award.sender, &award.recipient, award.amount)
            {
                tracing::warn!(
                    sender = %award.sender,
                    recipient = %award.recipient,
                    amount = award.amount,
                    error = %err,
                    "Dropping unrecordable ledger award"
                );
            }
        }
    }

    /// Seal a block when the pending pool has reached the threshold
    fn seal_on_threshold(&self) {
        let threshold = self.ledger_config.block_threshold;
        if let Some(block) = self.ledger.seal_if_threshold(
            threshold,
            self.ledger_config.random_proof(),
            self.ledger.node_id(),
        ) {
            tracing::info!(
                index = block.index,
                transactions = block.transactions.len(),
                "Transaction threshold reached, sealed a block"
            );
        }
    }
}
