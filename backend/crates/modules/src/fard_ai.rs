//! Fard-AI - Prayer Assistant
//!
//! The fallback module for envelopes without a module tag. Tracks the five
//! daily prayers and awards baraka points through the ledger.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use ledger::SYSTEM_SENDER;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::domain::contract::{
    DomainModule, ModuleKind, ModuleReply, PgTransaction, UserRef, require_actor,
};
use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::{Priority, Recommendation};
use crate::error::{ModuleError, ModuleResult};

/// The five obligatory prayers
const PRAYER_NAMES: [&str; 5] = ["fajr", "dhuhr", "asr", "maghrib", "isha"];

/// Baraka points for one marked prayer
const PRAYER_AWARD: u64 = 5;

/// Streak window examined when computing consecutive active days
const STREAK_WINDOW_DAYS: i64 = 60;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FardAiRequest {
    MarkPrayer { prayer_name: String },
    GetLearningProgress,
}

/// Prayer assistant module
#[derive(Debug, Clone, Copy, Default)]
pub struct FardAiModule;

#[async_trait]
impl DomainModule for FardAiModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::FardAi
    }

    async fn initialize(&self, _user: &users::User) -> ModuleResult<Value> {
        Ok(json!({
            "prayersMarked": 0,
            "currentStreak": 0,
            "dailyTarget": PRAYER_NAMES.len(),
        }))
    }

    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        match envelope.parse_op::<FardAiRequest>()? {
            FardAiRequest::MarkPrayer { prayer_name } => {
                self.mark_prayer(require_actor(actor)?, &prayer_name, tx).await
            }
            FardAiRequest::GetLearningProgress => {
                self.learning_progress(require_actor(actor)?, tx).await
            }
        }
    }

    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>> {
        let marked_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM prayer_logs
             WHERE user_id = $1 AND performed_at::date = CURRENT_DATE",
        )
        .bind(user.user_id.as_uuid())
        .fetch_one(pool)
        .await?;

        let remaining = PRAYER_NAMES.len() as i64 - marked_today;
        let recommendation = if remaining > 0 {
            Recommendation::new(
                ModuleKind::FardAi,
                format!("{remaining} prayers left today"),
                Priority::High,
            )
            .with_description("Mark each prayer to keep your streak and earn baraka")
        } else {
            Recommendation::new(ModuleKind::FardAi, "All prayers marked", Priority::Low)
                .with_description("Alhamdulillah, the day is complete")
        };
        Ok(vec![recommendation])
    }
}

impl FardAiModule {
    async fn mark_prayer(
        &self,
        actor: &UserRef,
        prayer_name: &str,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let prayer_name = prayer_name.trim().to_lowercase();
        if !PRAYER_NAMES.contains(&prayer_name.as_str()) {
            return Err(ModuleError::domain(format!(
                "Unknown prayer '{prayer_name}'. Expected one of: {}",
                PRAYER_NAMES.join(", ")
            )));
        }

        let already_marked: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM prayer_logs
                WHERE user_id = $1 AND prayer_name = $2 AND performed_at::date = CURRENT_DATE
            )",
        )
        .bind(actor.user_id.as_uuid())
        .bind(&prayer_name)
        .fetch_one(&mut **tx)
        .await?;
        if already_marked {
            return Err(ModuleError::domain(format!(
                "Prayer '{prayer_name}' is already marked for today"
            )));
        }

        sqlx::query("INSERT INTO prayer_logs (user_id, prayer_name) VALUES ($1, $2)")
            .bind(actor.user_id.as_uuid())
            .bind(&prayer_name)
            .execute(&mut **tx)
            .await?;

        sqlx::query("UPDATE users SET baraka_points = baraka_points + $2 WHERE user_id = $1")
            .bind(actor.user_id.as_uuid())
            .bind(PRAYER_AWARD as i64)
            .execute(&mut **tx)
            .await?;

        tracing::info!(public_id = %actor.public_id, prayer = %prayer_name, "Prayer marked");

        Ok(ModuleReply::data(json!({
            "prayer_name": prayer_name,
            "baraka_points_added": PRAYER_AWARD,
        }))
        .with_award(SYSTEM_SENDER, actor.public_id.clone(), PRAYER_AWARD))
    }

    async fn learning_progress(
        &self,
        actor: &UserRef,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply> {
        let total_prayers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM prayer_logs WHERE user_id = $1")
                .bind(actor.user_id.as_uuid())
                .fetch_one(&mut **tx)
                .await?;

        let marked_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM prayer_logs
             WHERE user_id = $1 AND performed_at::date = CURRENT_DATE",
        )
        .bind(actor.user_id.as_uuid())
        .fetch_one(&mut **tx)
        .await?;

        let active_days: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT DISTINCT performed_at::date FROM prayer_logs
             WHERE user_id = $1 AND performed_at::date > CURRENT_DATE - $2::int
             ORDER BY 1 DESC",
        )
        .bind(actor.user_id.as_uuid())
        .bind(STREAK_WINDOW_DAYS as i32)
        .fetch_all(&mut **tx)
        .await?;

        Ok(ModuleReply::data(json!({
            "total_prayers": total_prayers,
            "marked_today": marked_today,
            "daily_target": PRAYER_NAMES.len(),
            "current_streak": current_streak(&active_days, Utc::now().date_naive()),
        })))
    }
}

/// Consecutive active days ending today or yesterday
///
/// `active_days` must be distinct dates in descending order.
fn current_streak(active_days: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = active_days.first() else {
        return 0;
    };
    // A streak survives until a full day is missed
    if (today - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in active_days.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let days = [date("2026-08-05"), date("2026-08-04"), date("2026-08-03")];
        assert_eq!(current_streak(&days, date("2026-08-05")), 3);
    }

    #[test]
    fn test_streak_survives_one_unmarked_today() {
        let days = [date("2026-08-04"), date("2026-08-03")];
        assert_eq!(current_streak(&days, date("2026-08-05")), 2);
    }

    #[test]
    fn test_streak_breaks_on_gap() {
        let days = [date("2026-08-05"), date("2026-08-02")];
        assert_eq!(current_streak(&days, date("2026-08-05")), 1);

        let stale = [date("2026-08-01")];
        assert_eq!(current_streak(&stale, date("2026-08-05")), 0);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(current_streak(&[], date("2026-08-05")), 0);
    }
}
