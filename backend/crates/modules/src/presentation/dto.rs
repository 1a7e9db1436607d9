//! API DTOs (Data Transfer Objects)
//!
//! Typed request bodies for the per-module REST routes. Each handler maps
//! its DTO onto a request envelope, so the dispatcher sees exactly the
//! same shape the generic endpoint receives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use users::presentation::dto::UserResponse;

use crate::application::onboarding::WelcomePackage;
use crate::career_umma::JobLevel;
use crate::infra::analysis::TopicScore;

fn default_limit() -> i64 {
    20
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub language: Option<String>,
}

/// Registration response: account, key, and the welcome package
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub api_key: String,
    pub module_initializations: Map<String, Value>,
    pub welcome_package: WelcomePackage,
    pub next_steps: Vec<&'static str>,
}

/// Free-text analysis request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    pub text: String,
}

/// Free-text analysis response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextResponse {
    pub results: Vec<TopicScore>,
    pub cached: bool,
}

/// Mark-prayer request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPrayerRequest {
    pub prayer_name: String,
}

/// Sharia audit request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditProjectRequest {
    pub project_name: String,
    pub description: String,
}

/// Knowledge session creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSessionRequest {
    pub topic: String,
    pub time: String,
}

/// Waqf creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaqfCreateRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    /// Expected annual yield, e.g. 0.08 for 8%
    #[serde(default)]
    pub yield_pa: f64,
}

/// Donation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub amount: u64,
}

/// Fitness goal creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessGoalRequest {
    pub goal_type: String,
    pub target: String,
    pub deadline: Option<String>,
}

/// Goal progress update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressRequest {
    pub progress_value: f64,
}

/// Product photo check request; the image travels base64-encoded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhotoRequest {
    pub content: String,
    pub filename: Option<String>,
}

/// Job posting request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostRequest {
    pub title: String,
    pub description: String,
    pub company_name: Option<String>,
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    pub level: Option<JobLevel>,
}

/// Job search query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchQuery {
    pub query: Option<String>,
    pub location: Option<String>,
    pub level: Option<JobLevel>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Generic pagination query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
