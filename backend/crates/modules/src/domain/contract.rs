//! Module Contract
//!
//! The uniform capability set every domain module implements, and the
//! closed set of module kinds. The dispatcher treats modules uniformly and
//! knows nothing of their internals.

use async_trait::async_trait;
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::domain::envelope::RequestEnvelope;
use crate::domain::recommendation::Recommendation;
use crate::error::ModuleResult;

/// Per-request database transaction handed to a module
pub type PgTransaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Closed set of domain modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    FardAi,
    BaitulHikma,
    ArRihla,
    UmmahWaqf,
    SalamHealth,
    NutritionHalal,
    CareerUmma,
}

impl ModuleKind {
    /// Every module, in registration order
    pub const ALL: [ModuleKind; 7] = [
        ModuleKind::FardAi,
        ModuleKind::BaitulHikma,
        ModuleKind::ArRihla,
        ModuleKind::UmmahWaqf,
        ModuleKind::SalamHealth,
        ModuleKind::NutritionHalal,
        ModuleKind::CareerUmma,
    ];

    /// Module used when an envelope carries no module tag
    pub const FALLBACK: ModuleKind = ModuleKind::FardAi;

    /// Wire tag of the module
    pub const fn tag(&self) -> &'static str {
        use ModuleKind::*;
        match self {
            FardAi => "fard_ai",
            BaitulHikma => "baitul_hikma",
            ArRihla => "ar_rihla",
            UmmahWaqf => "ummah_waqf",
            SalamHealth => "salam_health",
            NutritionHalal => "nutrition_halal",
            CareerUmma => "career_umma",
        }
    }

    /// Resolve a wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Human-readable module description
    pub const fn description(&self) -> &'static str {
        use ModuleKind::*;
        match self {
            FardAi => "Assistant for daily worship and religious duties",
            BaitulHikma => "Sharia audit and expertise for investments",
            ArRihla => "Community of travellers exchanging knowledge",
            UmmahWaqf => "Digital charitable endowments",
            SalamHealth => "Health and fitness goals",
            NutritionHalal => "Halal screening of food products",
            CareerUmma => "Community job board",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Slim view of the resolved user a module receives
///
/// `None` stands for the anonymous "system" caller used by public
/// operations.
#[derive(Debug, Clone)]
pub struct UserRef {
    pub user_id: UserId,
    pub public_id: String,
    pub language: String,
}

/// A baraka-point transfer the dispatcher records on the ledger after the
/// transaction commits
///
/// Modules never touch the ledger directly: a rolled-back request must
/// leave no trace, on disk or on the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAward {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

/// Successful module reply: response payload plus deferred ledger awards
#[derive(Debug, Clone, Default)]
pub struct ModuleReply {
    pub data: Value,
    pub ledger_awards: Vec<LedgerAward>,
}

impl ModuleReply {
    pub fn data(data: Value) -> Self {
        Self {
            data,
            ledger_awards: Vec::new(),
        }
    }

    pub fn with_award(
        mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> Self {
        self.ledger_awards.push(LedgerAward {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        });
        self
    }
}

/// Capability set of a domain module
#[async_trait]
pub trait DomainModule: Send + Sync {
    /// The module's kind (and wire tag)
    fn kind(&self) -> ModuleKind;

    /// Produce the module's initial state for a freshly registered user
    async fn initialize(&self, user: &users::User) -> ModuleResult<Value>;

    /// Handle one request inside the dispatcher-owned transaction
    async fn handle(
        &self,
        actor: Option<&UserRef>,
        envelope: &RequestEnvelope,
        tx: &mut PgTransaction<'_>,
    ) -> ModuleResult<ModuleReply>;

    /// Daily recommendations for the dashboard; read-only
    async fn daily_recommendations(
        &self,
        user: &UserRef,
        pool: &PgPool,
    ) -> ModuleResult<Vec<Recommendation>>;
}

/// Fail a handler that requires an authenticated user
pub fn require_actor<'a>(actor: Option<&'a UserRef>) -> ModuleResult<&'a UserRef> {
    actor.ok_or_else(|| crate::error::ModuleError::domain("User not found"))
}
