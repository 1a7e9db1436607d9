//! Ar-Rihla - Knowledge Exchange
//!
//! Community sessions where travellers of knowledge teach and learn.

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

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ArRihlaRequest {
    CreateKnowledgeSession {
        topic: String,
        time: String,
    },
    ListSessions {
        #[serde(default)]
        skip: i64,
        #[serde(default = "default_limit")]
        limit: i64,
    },
}

/// Knowledge exchange module
#[derive(Debug, Clone, Copy, Default)]
pub struct ArRihlaModule;

#[async_trait]
impl DomainModule for ArRihlaModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::ArRihla
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "sessionsHosted": 0,
            "sessionsJoined": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        match envelope.parse_op::<ArRihlaRequest>()? {
            ArRihlaRequest::CreateKnowledgeSession { topic, time } => {
                self.create_session(require_actor(actor)?, &topic, &time, tx)
                    .await
            }
            // Listing is public
            ArRihlaRequest::ListSessions { skip, limit } => {
                self.list_sessions(skip, limit, tx).await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        _user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let recent: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM knowledge_sessions
             WHERE created_at > NOW() - INTERVAL '7 days'",
        )
        .fetch_one(pool)
        .await?;

        let recommendation = if recent > 0 {
            Recommendation::new(
                ModuleKind::ArRihla,
                format!("{recent} new knowledge sessions this week"),
                Priority::Medium,
            )
            .with_description("Join one and learn something new")
        } else {
            Recommendation::new(ModuleKind::ArRihla, "Host a knowledge session", Priority::Low)
                .with_description("Share what you know with the community")
        };
        Ok(vec![recommendation])
    }
}

impl ArRihlaModule {
    async fn create_session(
        &self,
        actor: &UserRef,
        topic: &str,
        time: &str,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ModuleError::domain("Session topic must not be empty"));
        }
        if time.trim().is_empty() {
            return Err(ModuleError::domain("Session time must not be empty"));
        }

        let session_id: i64 = sqlx::query_scalar(
            "INSERT INTO knowledge_sessions (host_id, topic, scheduled_for)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(actor.user_id.as_uuid())
        .bind(topic)
        .bind(time.trim())
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(session_id, topic = %topic, "Knowledge session created");

        Ok(ModuleReply::data(json!({
            "session_id": session_id,
            "topic": topic,
            "scheduled_for": time.trim(),
        })))
    }

    async fn list_sessions(
        &self,
        skip: i64,
        limit: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let skip = skip.max(0);
        let limit = limit.clamp(1, 100);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_sessions")
            .fetch_one(&mut **tx)
            .await?;

        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT s.id, s.topic, s.scheduled_for, s.created_at, u.public_id AS host
             FROM knowledge_sessions s
             JOIN users u ON u.user_id = s.host_id
             ORDER BY s.created_at DESC
             OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;

        let sessions: Vec<Value> = rows
            .into_iter()
            .map(|row| {
                json!({
                    "session_id": row.id,
                    "topic": row.topic,
                    "scheduled_for": row.scheduled_for,
                    "host": row.host,
                    "created_at": row.created_at,
                })
            })
            .collect();

        Ok(ModuleReply::data(json!({
            "sessions": sessions,
            "total": total,
        })))
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    topic: String,
    scheduled_for: String,
    created_at: DateTime<Utc>,
    host: String,
}
