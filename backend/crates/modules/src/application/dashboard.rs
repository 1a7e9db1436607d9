//! Daily Dashboard Use Case
//!
//! Aggregates daily recommendations across every registered module and
//! tops them up with cross-module synergy suggestions. A module that fails
//! to produce recommendations is skipped with a warning; one broken module
//! never empties the dashboard.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use users::User;

use crate::domain::contract::UserRef;
use crate::domain::recommendation::{Recommendation, prioritize};
use crate::error::ModuleResult;
use crate::orchestrator::{Orchestrator, Synergy};
use crate::registry::ModuleRegistry;

/// The daily dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDashboard {
    pub public_id: String,
    pub baraka_points: i64,
    pub recommendations: Vec<Recommendation>,
    pub synergies: Vec<Synergy>,
}

/// Daily Dashboard Use Case
pub struct DashboardUseCase {
    pool: PgPool,
    registry: Arc<ModuleRegistry>,
    orchestrator: Orchestrator,
}

impl DashboardUseCase {
    pub fn new(pool: PgPool, registry: Arc<ModuleRegistry>) -> Self {
        Self {
            pool,
            registry,
            orchestrator: Orchestrator::new(),
        }
    }

    pub async fn execute(&self, user: &User) -> ModuleResult<DailyDashboard> {
        let user_ref = UserRef {
            user_id: user.user_id,
            public_id: user.public_id.as_str().to_string(),
            language: user.language.clone(),
        };

        let mut recommendations = Vec::new();
        for module in self.registry.iter() {
            match module.daily_recommendations(&user_ref, &self.pool).await {
                Ok(module_recommendations) => recommendations.extend(module_recommendations),
                Err(err) => {
                    tracing::warn!(
                        module = %module.kind(),
                        error = %err,
                        "Skipping module recommendations"
                    );
                }
            }
        }

        Ok(DailyDashboard {
            public_id: user_ref.public_id,
            baraka_points: user.baraka_points,
            recommendations: prioritize(recommendations),
            synergies: self.orchestrator.synergies(),
        })
    }
}
