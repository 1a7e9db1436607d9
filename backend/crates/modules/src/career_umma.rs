//! Career Umma - Community Job Board
//!
//! Job postings, public search, and applications. Authors see their
//! applicants; applicants cannot respond to their own postings or apply
//! twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
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

/// Seniority ladder for postings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Intern,
    Junior,
    Middle,
    Senior,
    Lead,
}

impl JobLevel {
    pub const fn code(&self) -> &'static str {
        use JobLevel::*;
        match self {
            Intern => "intern",
            Junior => "junior",
            Middle => "middle",
            Senior => "senior",
            Lead => "lead",
        }
    }
}

/// Lifecycle of one application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Submitted,
    Viewed,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub const fn code(&self) -> &'static str {
        use ApplicationStatus::*;
        match self {
            Submitted => "submitted",
            Viewed => "viewed",
            Rejected => "rejected",
            Accepted => "accepted",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CareerUmmaRequest {
    PostJob {
        title: String,
        description: String,
        #[serde(default)]
        company_name: Option<String>,
        location: String,
        #[serde(default)]
        is_remote: bool,
        #[serde(default)]
        level: Option<JobLevel>,
    },
    SearchJobs {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        level: Option<JobLevel>,
        #[serde(default)]
        skip: i64,
        #[serde(default = "default_limit")]
        limit: i64,
    },
    ApplyForJob {
        vacancy_id: i64,
    },
    GetJobApplications {
        vacancy_id: i64,
        #[serde(default)]
        skip: i64,
        #[serde(default = "default_limit")]
        limit: i64,
    },
}

/// Job board module
#[derive(Debug, Clone, Copy, Default)]
pub struct CareerUmmaModule;

#[async_trait]
impl DomainModule for CareerUmmaModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::CareerUmma
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "jobsPosted": 0,
            "applicationsSent": 0,
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        match envelope.parse_op::<CareerUmmaRequest>()? {
            CareerUmmaRequest::PostJob {
                title,
                description,
                company_name,
                location,
                is_remote,
                level,
            } => {
                let posting = NewPosting {
                    title,
                    description,
                    company_name,
                    location,
                    is_remote,
                    level,
                };
                self.post_job(require_actor(actor)?, posting, tx).await
            }
            // Search is public
            CareerUmmaRequest::SearchJobs {
                query,
                location,
                level,
                skip,
                limit,
            } => {
                self.search_jobs(query.as_deref(), location.as_deref(), level, skip, limit, tx)
                    .await
            }
            CareerUmmaRequest::ApplyForJob { vacancy_id } => {
                self.apply(require_actor(actor)?, vacancy_id, tx).await
            }
            CareerUmmaRequest::GetJobApplications {
                vacancy_id,
                skip,
                limit,
            } => {
                self.applications(require_actor(actor)?, vacancy_id, skip, limit, tx)
                    .await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let fresh_jobs: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM job_posts
             WHERE is_open AND author_id <> $1 AND created_at > NOW() - INTERVAL '7 days'",
        )
        .bind(user.user_id.as_uuid())
        .fetch_one(pool)
        .await?;

        if fresh_jobs > 0 {
            Ok(vec![
                Recommendation::new(
                    ModuleKind::CareerUmma,
                    format!("{fresh_jobs} new jobs this week"),
                    Priority::Medium,
                )
                .with_description("Browse the board before the best ones close"),
            ])
        } else {
            Ok(Vec::new())
        }
    }
}

struct NewPosting {
    title: String,
    description: String,
    company_name: Option<String>,
    location: String,
    is_remote: bool,
    level: Option<JobLevel>,
}

impl CareerUmmaModule {
    async fn post_job(
        &self,
        actor: &UserRef,
        posting: NewPosting,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let title = posting.title.trim();
        if title.is_empty() {
            return Err(ModuleError::domain("Job title must not be empty"));
        }
        if posting.description.trim().is_empty() {
            return Err(ModuleError::domain("Job description must not be empty"));
        }
        if posting.location.trim().is_empty() {
            return Err(ModuleError::domain("Job location must not be empty"));
        }

        let vacancy_id: i64 = sqlx::query_scalar(
            "INSERT INTO job_posts (author_id, title, description, company_name, location, is_remote, level)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(actor.user_id.as_uuid())
        .bind(title)
        .bind(posting.description.trim())
        .bind(posting.company_name.as_deref().map(str::trim))
        .bind(posting.location.trim())
        .bind(posting.is_remote)
        .bind(posting.level.map(|l| l.code()))
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(vacancy_id, title = %title, "Job posted");

        Ok(ModuleReply::data(json!({
            "vacancy_id": vacancy_id,
            "title": title,
            "level": posting.level,
        })))
    }

    async fn search_jobs(
        &self,
        query: Option<&str>,
        location: Option<&str>,
        level: Option<JobLevel>,
        skip: i64,
        limit: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let skip = skip.max(0);
        let limit = limit.clamp(1, 100);
        // Keyword matching over title and description
        let pattern = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{q}%"));

        const FILTERS: &str = "is_open
             AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
             AND ($2::text IS NULL OR location ILIKE $2)
             AND ($3::text IS NULL OR level = $3)";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM job_posts WHERE {FILTERS}"
        ))
        .bind(pattern.as_deref())
        .bind(location.map(str::trim))
        .bind(level.map(|l| l.code()))
        .fetch_one(&mut **tx)
        .await?;

        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT j.id, j.title, j.description, j.company_name, j.location,
                    j.is_remote, j.level, j.created_at, u.public_id AS author
             FROM job_posts j
             JOIN users u ON u.user_id = j.author_id
             WHERE {FILTERS}
             ORDER BY j.created_at DESC
             OFFSET $4 LIMIT $5"
        ))
        .bind(pattern.as_deref())
        .bind(location.map(str::trim))
        .bind(level.map(|l| l.code()))
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;

        let jobs: Vec<Value> = rows.into_iter().map(JobRow::into_json).collect();

        Ok(ModuleReply::data(json!({
            "jobs": jobs,
            "total": total,
        })))
    }

    async fn apply(
        &self,
        actor: &UserRef,
        vacancy_id: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let vacancy: Option<(uuid::Uuid, bool)> =
            sqlx::query_as("SELECT author_id, is_open FROM job_posts WHERE id = $1")
                .bind(vacancy_id)
                .fetch_optional(&mut **tx)
                .await?;

        let (author_id, is_open) =
            vacancy.ok_or_else(|| ModuleError::domain("Vacancy not found"))?;
        if !is_open {
            return Err(ModuleError::domain("This vacancy is no longer open"));
        }
        if author_id == *actor.user_id.as_uuid() {
            return Err(ModuleError::domain("Cannot apply to your own job posting"));
        }

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM job_applications
                WHERE vacancy_id = $1 AND applicant_id = $2
            )",
        )
        .bind(vacancy_id)
        .bind(actor.user_id.as_uuid())
        .fetch_one(&mut **tx)
        .await?;
        if already_applied {
            return Err(ModuleError::domain("You have already applied to this vacancy"));
        }

        let application_id: i64 = sqlx::query_scalar(
            "INSERT INTO job_applications (vacancy_id, applicant_id, status)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(vacancy_id)
        .bind(actor.user_id.as_uuid())
        .bind(ApplicationStatus::Submitted.code())
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(vacancy_id, application_id, "Application submitted");

        Ok(ModuleReply::data(json!({
            "application_id": application_id,
            "vacancy_id": vacancy_id,
            "status": ApplicationStatus::Submitted,
        })))
    }

    async fn applications(
        &self,
        actor: &UserRef,
        vacancy_id: i64,
        skip: i64,
        limit: i64,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let skip = skip.max(0);
        let limit = limit.clamp(1, 100);

        let author_id: Option<uuid::Uuid> =
            sqlx::query_scalar("SELECT author_id FROM job_posts WHERE id = $1")
                .bind(vacancy_id)
                .fetch_optional(&mut **tx)
                .await?;
        let author_id = author_id.ok_or_else(|| ModuleError::domain("Vacancy not found"))?;
        if author_id != *actor.user_id.as_uuid() {
            return Err(ModuleError::domain(
                "Only the author of the vacancy can view its applications",
            ));
        }

        let rows: Vec<ApplicationRow> = sqlx::query_as(
            "SELECT a.id, a.status, a.created_at, u.public_id AS applicant
             FROM job_applications a
             JOIN users u ON u.user_id = a.applicant_id
             WHERE a.vacancy_id = $1
             ORDER BY a.created_at
             OFFSET $2 LIMIT $3",
        )
        .bind(vacancy_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **tx)
        .await?;

        let applications: Vec<Value> = rows
            .into_iter()
            .map(|row| {
                json!({
                    "application_id": row.id,
                    "applicant": row.applicant,
                    "status": row.status,
                    "applied_at": row.created_at,
                })
            })
            .collect();

        Ok(ModuleReply::data(json!({
            "vacancy_id": vacancy_id,
            "applications": applications,
        })))
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: i64,
    title: String,
    description: String,
    company_name: Option<String>,
    location: String,
    is_remote: bool,
    level: Option<String>,
    created_at: DateTime<Utc>,
    author: String,
}

impl JobRow {
    fn into_json(self) -> Value {
        json!({
            "vacancy_id": self.id,
            "title": self.title,
            "description": self.description,
            "company_name": self.company_name,
            "location": self.location,
            "is_remote": self.is_remote,
            "level": self.level,
            "author": self.author,
            "created_at": self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    status: String,
    created_at: DateTime<Utc>,
    applicant: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_level_codes_round_trip() {
        for level in [
            JobLevel::Intern,
            JobLevel::Junior,
            JobLevel::Middle,
            JobLevel::Senior,
            JobLevel::Lead,
        ] {
            let serialized = serde_json::to_string(&level).unwrap();
            assert_eq!(serialized, format!("\"{}\"", level.code()));
            let parsed: JobLevel = serde_json::from_str(&serialized).unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_search_request_defaults() {
        let envelope = RequestEnvelope::new(
            Some("career_umma"),
            "search_jobs",
            json!({"query": "rust"}),
        );
        let parsed: CareerUmmaRequest = envelope.parse_op().unwrap();
        match parsed {
            CareerUmmaRequest::SearchJobs {
                query,
                location,
                level,
                skip,
                limit,
            } => {
                assert_eq!(query.as_deref(), Some("rust"));
                assert!(location.is_none());
                assert!(level.is_none());
                assert_eq!(skip, 0);
                assert_eq!(limit, 20);
            }
            other => panic!("parsed wrong variant: {other:?}"),
        }
    }
}
