//! Salam Health - Fitness Goals
//!
//! Personal health goals with ownership-checked progress updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::domain::contract::{
    DomainModule, ModuleKind, ModuleReply, PgTransaction, UserRef, require_actor,
};
use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::{Priority, Recommendation};
use crate::error::{ModuleError, ModuleResult};

/// Progress at or above this value marks a goal as achieved
const GOAL_COMPLETE: f64 = 100.0;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SalamHealthRequest {
    SetFitnessGoal {
        goal_type: String,
        target: String,
        deadline: Option<String>,
    },
    GetFitnessGoals,
    UpdateGoalProgress {
        goal_id: i64,
        progress_value: f64,
    },
}

/// Health goals module
#[derive(Debug, Clone, Copy, Default)]
pub struct SalamHealthModule;

#[async_trait]
impl DomainModule for SalamHealthModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::SalamHealth
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "activeGoals": 0,
            "completedGoals": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let actor = require_actor(actor)?;
        match envelope.parse_op::<SalamHealthRequest>()? {
            SalamHealthRequest::SetFitnessGoal {
                goal_type,
                target,
                deadline,
            } => {
                self.set_goal(actor, &goal_type, &target, deadline.as_deref(), tx)
                    .await
            }
            SalamHealthRequest::GetFitnessGoals => self.list_goals(actor, tx).await,
            SalamHealthRequest::UpdateGoalProgress {
                goal_id,
                progress_value,
            } => self.update_progress(actor, goal_id, progress_value, tx).await,
        }
    }

    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let open_goals: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fitness_goals WHERE user_id = $1 AND progress < $2",
        )
        .bind(user.user_id.as_uuid())
        .bind(GOAL_COMPLETE)
        .fetch_one(pool)
        .await?;

        let recommendation = if open_goals > 0 {
            Recommendation::new(
                ModuleKind::SalamHealth,
                format!("{open_goals} fitness goals in progress"),
                Priority::Medium,
            )
            .with_description("Log today's progress while it is fresh")
        } else {
            Recommendation::new(ModuleKind::SalamHealth, "Set a fitness goal", Priority::Low)
                .with_description("A strong believer is more beloved than a weak one")
        };
        Ok(vec![recommendation])
    }
}

impl SalamHealthModule {
    async fn set_goal(
        &self,
        actor: &UserRef,
        goal_type: &str,
        target: &str,
        deadline: Option<&str>,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let goal_type = goal_type.trim();
        if goal_type.is_empty() {
            return Err(ModuleError::domain("Goal type must not be empty"));
        }
        if target.trim().is_empty() {
            return Err(ModuleError::domain("Goal target must not be empty"));
        }

        let goal_id: i64 = sqlx::query_scalar(
            "INSERT INTO fitness_goals (user_id, goal_type, target, deadline)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(actor.user_id.as_uuid())
        .bind(goal_type)
        .bind(target.trim())
        .bind(deadline.map(str::trim))
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(goal_id, goal_type = %goal_type, "Fitness goal set");

        Ok(ModuleReply::data(json!({
            "goal_id": goal_id,
            "goal_type": goal_type,
            "target": target.trim(),
            "deadline": deadline.map(str::trim),
            "progress": 0.0,
        })))
    }

    async fn list_goals(
        &self,
        actor: &UserRef,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT id, goal_type, target, deadline, progress, created_at, updated_at
             FROM fitness_goals
             WHERE user_id = $1
             ORDER BY created_at",
        )
        .bind(actor.user_id.as_uuid())
        .fetch_all(&mut **tx)
        .await?;

        let goals: Vec<Value> = rows
            .into_iter()
            .map(|row| {
                json!({
                    "goal_id": row.id,
                    "goal_type": row.goal_type,
                    "target": row.target,
                    "deadline": row.deadline,
                    "progress": row.progress,
                    "achieved": row.progress >= GOAL_COMPLETE,
                    "created_at": row.created_at,
                    "updated_at": row.updated_at,
                })
            })
            .collect();

        Ok(ModuleReply::data(json!({
            "goals": goals,
        })))
    }

    async fn update_progress(
        &self,
        actor: &UserRef,
        goal_id: i64,
        progress_value: f64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        if !(0.0..=GOAL_COMPLETE).contains(&progress_value) {
            return Err(ModuleError::domain(
                "Progress must be between 0 and 100",
            ));
        }

        // The user_id filter is the ownership check: another user's goal
        // behaves exactly like a missing one.
        let updated: Option<f64> = sqlx::query_scalar(
            "UPDATE fitness_goals
             SET progress = $3, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING progress",
        )
        .bind(goal_id)
        .bind(actor.user_id.as_uuid())
        .bind(progress_value)
        .fetch_optional(&mut **tx)
        .await?;

        let progress = updated.ok_or_else(|| ModuleError::domain("Goal not found"))?;

        tracing::info!(goal_id, progress, "Goal progress updated");

        Ok(ModuleReply::data(json!({
            "goal_id": goal_id,
            "progress": progress,
            "achieved": progress >= GOAL_COMPLETE,
        })))
    }
}

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: i64,
    goal_type: String,
    target: String,
    deadline: Option<String>,
    progress: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
