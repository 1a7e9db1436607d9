//! Baitul Hikma - Sharia Audit
//!
//! Keyword screening of investment project descriptions. Verdicts are
//! persisted so a project can be looked up later by anyone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger::SYSTEM_SENDER;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::domain::contract::{
    DomainModule, ModuleKind, ModuleReply, PgTransaction, UserRef, require_actor,
};
use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::{Priority, Recommendation};
use crate::error::{ModuleError, ModuleResult};

/// Baraka points for contributing an audit
const AUDIT_AWARD: u64 = 10;

/// Markers that make a project impermissible outright
const PROHIBITED_MARKERS: &[(&str, &str)] = &[
    ("riba", "Interest-bearing income (riba)"),
    ("interest", "Interest-bearing income (riba)"),
    ("usury", "Interest-bearing income (riba)"),
    ("gambling", "Games of chance (maysir)"),
    ("casino", "Games of chance (maysir)"),
    ("lottery", "Games of chance (maysir)"),
    ("alcohol", "Production or sale of intoxicants"),
    ("brewery", "Production or sale of intoxicants"),
    ("pork", "Pork products"),
    ("tobacco", "Tobacco products"),
];

/// Markers that demand scholarly review before a verdict
const REVIEW_MARKERS: &[(&str, &str)] = &[
    ("insurance", "Conventional insurance structure (gharar)"),
    ("derivative", "Speculative derivative exposure"),
    ("leverage", "Debt leverage above permissible limits"),
    ("bond", "Conventional bond income"),
    ("music", "Entertainment revenue requires review"),
];

/// Audit verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditVerdict {
    Compliant,
    NonCompliant,
    NeedsReview,
}

impl AuditVerdict {
    const fn code(&self) -> &'static str {
        match self {
            AuditVerdict::Compliant => "compliant",
            AuditVerdict::NonCompliant => "non_compliant",
            AuditVerdict::NeedsReview => "needs_review",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BaitulHikmaRequest {
    AuditProject {
        project_name: String,
        description: String,
    },
    GetProjectDetails {
        project_id: i64,
    },
}

/// Sharia audit module
#[derive(Debug, Clone, Copy, Default)]
pub struct BaitulHikmaModule;

#[async_trait]
impl DomainModule for BaitulHikmaModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BaitulHikma
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "projectsAudited": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        match envelope.parse_op::<BaitulHikmaRequest>()? {
            BaitulHikmaRequest::AuditProject {
                project_name,
                description,
            } => {
                self.audit_project(require_actor(actor)?, &project_name, &description, tx)
                    .await
            }
            // Project details are public; no actor required
            BaitulHikmaRequest::GetProjectDetails { project_id } => {
                self.project_details(project_id, tx).await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let audits: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sharia_audits
             WHERE auditor_id = $1 AND created_at > NOW() - INTERVAL '30 days'",
        )
        .bind(user.user_id.as_uuid())
        .fetch_one(pool)
        .await?;

        if audits == 0 {
            Ok(vec![
                Recommendation::new(
                    ModuleKind::BaitulHikma,
                    "Screen before you invest",
                    Priority::Medium,
                )
                .with_description("Run a sharia audit on the next project you consider"),
            ])
        } else {
            Ok(Vec::new())
        }
    }
}

impl BaitulHikmaModule {
    async fn audit_project(
        &self,
        actor: &UserRef,
        project_name: &str,
        description: &str,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let project_name = project_name.trim();
        if project_name.is_empty() {
            return Err(ModuleError::domain("Project name must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(ModuleError::domain("Project description must not be empty"));
        }

        let (verdict, concerns) = screen_description(description);

        let project_id: i64 = sqlx::query_scalar(
            "INSERT INTO sharia_audits (auditor_id, project_name, description, verdict, concerns)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(actor.user_id.as_uuid())
        .bind(project_name)
        .bind(description)
        .bind(verdict.code())
        .bind(serde_json::to_string(&concerns)?)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("UPDATE users SET baraka_points = baraka_points + $2 WHERE user_id = $1")
            .bind(actor.user_id.as_uuid())
            .bind(AUDIT_AWARD as i64)
            .execute(&mut **tx)
            .await?;

        tracing::info!(
            project_id,
            verdict = verdict.code(),
            concerns = concerns.len(),
            "Project audited"
        );

        Ok(ModuleReply::data(json!({
            "project_id": project_id,
            "project_name": project_name,
            "verdict": verdict,
            "concerns": concerns,
            "baraka_points_added": AUDIT_AWARD,
        }))
        .with_award(SYSTEM_SENDER, actor.public_id.clone(), AUDIT_AWARD))
    }

    async fn project_details(
        &self,
        project_id: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let row: Option<AuditRow> = sqlx::query_as(
            "SELECT id, project_name, description, verdict, concerns, created_at
             FROM sharia_audits WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(&mut **tx)
        .await?;

        let row = row.ok_or_else(|| ModuleError::domain("Project not found"))?;
        let concerns: Vec<String> = serde_json::from_str(&row.concerns).unwrap_or_default();

        Ok(ModuleReply::data(json!({
            "project_id": row.id,
            "project_name": row.project_name,
            "description": row.description,
            "verdict": row.verdict,
            "concerns": concerns,
            "audited_at": row.created_at,
        })))
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    project_name: String,
    description: String,
    verdict: String,
    concerns: String,
    created_at: DateTime<Utc>,
}

/// Keyword screening of a project description
///
/// Prohibited markers dominate review markers; a clean text is compliant.
fn screen_description(description: &str) -> (AuditVerdict, Vec<String>) {
    let lowered = description.to_lowercase();

    let mut concerns: Vec<String> = PROHIBITED_MARKERS
        .iter()
        .filter(|(marker, _)| lowered.contains(marker))
        .map(|(_, concern)| (*concern).to_string())
        .collect();
    concerns.dedup();
    if !concerns.is_empty() {
        return (AuditVerdict::NonCompliant, concerns);
    }

    let mut review: Vec<String> = REVIEW_MARKERS
        .iter()
        .filter(|(marker, _)| lowered.contains(marker))
        .map(|(_, concern)| (*concern).to_string())
        .collect();
    review.dedup();
    if !review.is_empty() {
        return (AuditVerdict::NeedsReview, review);
    }

    (AuditVerdict::Compliant, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_description_is_compliant() {
        let (verdict, concerns) =
            screen_description("A halal grocery delivery service for the local community");
        assert_eq!(verdict, AuditVerdict::Compliant);
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_prohibited_marker_fails_outright() {
        let (verdict, concerns) =
            screen_description("High-yield fund earning Interest on consumer loans");
        assert_eq!(verdict, AuditVerdict::NonCompliant);
        assert_eq!(concerns, vec!["Interest-bearing income (riba)".to_string()]);
    }

    #[test]
    fn test_prohibited_dominates_review() {
        let (verdict, _) =
            screen_description("A casino resort with an attached insurance product");
        assert_eq!(verdict, AuditVerdict::NonCompliant);
    }

    #[test]
    fn test_review_marker_needs_review() {
        let (verdict, concerns) = screen_description("Real estate fund using moderate leverage");
        assert_eq!(verdict, AuditVerdict::NeedsReview);
        assert_eq!(concerns.len(), 1);
    }

    #[test]
    fn test_duplicate_markers_reported_once() {
        let (_, concerns) = screen_description("riba riba interest usury");
        assert_eq!(concerns, vec!["Interest-bearing income (riba)".to_string()]);
    }
}
