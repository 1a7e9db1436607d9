//! Ummah Waqf - Digital Charitable Endowments
//!
//! Waqf creation, browsing, and donations. Every donation is mirrored on
//! the ledger as a donor-to-waqf transfer once the request commits.

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
enum UmmahWaqfRequest {
    CreateWaqf {
        name: String,
        category: String,
        description: String,
        #[serde(default)]
        yield_pa: f64,
    },
    ListWaqfs {
        #[serde(default)]
        skip: i64,
        #[serde(default = "default_limit")]
        limit: i64,
    },
    Donate {
        waqf_id: i64,
        amount: u64,
    },
}

/// Charitable endowments module
#[derive(Debug, Clone, Copy, Default)]
pub struct UmmahWaqfModule;

#[async_trait]
impl DomainModule for UmmahWaqfModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::UmmahWaqf
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "waqfsFounded": 0,
            "totalDonated": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        match envelope.parse_op::<UmmahWaqfRequest>()? {
            UmmahWaqfRequest::CreateWaqf {
                name,
                category,
                description,
                yield_pa,
            } => {
                self.create_waqf(require_actor(actor)?, &name, &category, &description, yield_pa, tx)
                    .await
            }
            // The catalogue is public
            UmmahWaqfRequest::ListWaqfs { skip, limit } => self.list_waqfs(skip, limit, tx).await,
            UmmahWaqfRequest::Donate { waqf_id, amount } => {
                self.donate(require_actor(actor)?, waqf_id, amount, tx).await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let donated_this_week: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM waqf_donations
                WHERE donor_id = $1 AND created_at > NOW() - INTERVAL '7 days'
            )",
        )
        .bind(user.user_id.as_uuid())
        .fetch_one(pool)
        .await?;
        if donated_this_week {
            return Ok(Vec::new());
        }

        // Surface the youngest waqf to keep suggestions fresh
        let newest: Option<String> =
            sqlx::query_scalar("SELECT name FROM waqfs ORDER BY created_at DESC LIMIT 1")
                .fetch_optional(pool)
                .await?;

        let recommendation = match newest {
            Some(name) => Recommendation::new(
                ModuleKind::UmmahWaqf,
                format!("Support \"{name}\""),
                Priority::Medium,
            )
            .with_description("Even a small sadaqah counts as ongoing charity"),
            None => Recommendation::new(ModuleKind::UmmahWaqf, "Found the first waqf", Priority::Low)
                .with_description("Start an endowment the whole community can build on"),
        };
        Ok(vec![recommendation])
    }
}

impl UmmahWaqfModule {
    async fn create_waqf(
        &self,
        actor: &UserRef,
        name: &str,
        category: &str,
        description: &str,
        yield_pa: f64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModuleError::domain("Waqf name must not be empty"));
        }
        if category.trim().is_empty() {
            return Err(ModuleError::domain("Waqf category must not be empty"));
        }
        if !(0.0..=1.0).contains(&yield_pa) {
            return Err(ModuleError::domain(
                "Expected yield must be between 0.0 and 1.0",
            ));
        }

        let name_taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM waqfs WHERE name = $1)")
                .bind(name)
                .fetch_one(&mut **tx)
                .await?;
        if name_taken {
            return Err(ModuleError::domain(format!(
                "A waqf named \"{name}\" already exists"
            )));
        }

        let waqf_id: i64 = sqlx::query_scalar(
            "INSERT INTO waqfs (name, category, description, creator_id, yield_pa)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(name)
        .bind(category.trim())
        .bind(description)
        .bind(actor.user_id.as_uuid())
        .bind(yield_pa)
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(waqf_id, name = %name, "Waqf created");

        Ok(ModuleReply::data(json!({
            "waqf_id": waqf_id,
            "name": name,
            "category": category.trim(),
        })))
    }

    async fn list_waqfs(
        &self,
        skip: i64,
        limit: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let skip = skip.max(0);
        let limit = limit.clamp(1, 100);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waqfs")
            .fetch_one(&mut **tx)
            .await?;

        let rows: Vec<WaqfRow> = sqlx::query_as(
            "SELECT id, name, category, description, total_value, yield_pa, created_at
             FROM waqfs
             ORDER BY created_at
             OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;

        let waqfs: Vec<Value> = rows
            .into_iter()
            .map(|row| {
                json!({
                    "waqf_id": row.id,
                    "name": row.name,
                    "category": row.category,
                    "description": row.description,
                    "total_value": row.total_value,
                    "yield_pa": row.yield_pa,
                    "created_at": row.created_at,
                })
            })
            .collect();

        Ok(ModuleReply::data(json!({
            "waqfs": waqfs,
            "total": total,
        })))
    }

    async fn donate(
        &self,
        actor: &UserRef,
        waqf_id: i64,
        amount: u64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        if amount == 0 {
            return Err(ModuleError::domain("Donation amount must be positive"));
        }

        let waqf_name: Option<String> = sqlx::query_scalar("SELECT name FROM waqfs WHERE id = $1")
            .bind(waqf_id)
            .fetch_optional(&mut **tx)
            .await?;
        let waqf_name = waqf_name.ok_or_else(|| ModuleError::domain("Waqf not found"))?;

        sqlx::query(
            "INSERT INTO waqf_donations (waqf_id, donor_id, amount)
             VALUES ($1, $2, $3)",
        )
        .bind(waqf_id)
        .bind(actor.user_id.as_uuid())
        .bind(amount as i64)
        .execute(&mut **tx)
        .await?;

        sqlx::query("UPDATE waqfs SET total_value = total_value + $2 WHERE id = $1")
            .bind(waqf_id)
            .bind(amount as f64)
            .execute(&mut **tx)
            .await?;

        tracing::info!(waqf_id, amount, "Donation recorded");

        Ok(ModuleReply::data(json!({
            "waqf_id": waqf_id,
            "waqf_name": waqf_name,
            "donation_made": amount,
        }))
        .with_award(
            actor.public_id.clone(),
            format!("waqf:{waqf_id}"),
            amount,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct WaqfRow {
    id: i64,
    name: String,
    category: String,
    description: String,
    total_value: f64,
    yield_pa: f64,
    created_at: DateTime<Utc>,
}
