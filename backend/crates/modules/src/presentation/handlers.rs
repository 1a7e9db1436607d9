//! HTTP Handlers
//!
//! Thin translation from REST routes to request envelopes. The dispatcher
//! reports failures cooperatively through the success flag; handlers turn
//! an unsuccessful outcome into the route's failure status.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::cache::{CacheStore, MemoryCache};
use serde_json::{Value, json};
use users::presentation::dto::UserResponse;
use users::{CurrentUser, PgUsersRepository};

use crate::application::dashboard::{DailyDashboard, DashboardUseCase};
use crate::application::dispatcher::{DispatchResponse, Dispatcher};
use crate::application::onboarding::{OnboardingInput, OnboardingUseCase};
use crate::domain::contract::ModuleKind;
use crate::domain::envelope::RequestEnvelope;
use crate::error::ModuleResult;
use crate::infra::analysis::TextAnalyzer;
use crate::presentation::dto::{
    AnalyzeTextRequest, AnalyzeTextResponse, AuditProjectRequest, CheckPhotoRequest,
    DonationRequest, FitnessGoalRequest, GoalProgressRequest, JobPostRequest, JobSearchQuery,
    KnowledgeSessionRequest, MarkPrayerRequest, PageQuery, RegisterRequest, RegisterResponse,
    WaqfCreateRequest,
};

/// Cached text-analysis lifetime
const ANALYSIS_TTL: Duration = Duration::from_secs(3600);

/// Shared state for module handlers
#[derive(Clone)]
pub struct ModulesAppState {
    pub dispatcher: Arc<Dispatcher>,
    pub dashboard: Arc<DashboardUseCase>,
    pub onboarding: Arc<OnboardingUseCase<PgUsersRepository>>,
    pub analyzer: TextAnalyzer,
    pub cache: MemoryCache,
}

/// Translate a dispatch outcome into the route's response
///
/// The status code for an unsuccessful outcome is the route's choice, not
/// the dispatcher's.
fn respond(
    outcome: DispatchResponse,
    failure_kind: ErrorKind,
) -> Result<Json<DispatchResponse>, AppError> {
    if outcome.success {
        Ok(Json(outcome))
    } else {
        let message = outcome
            .error
            .unwrap_or_else(|| "Request failed".to_string());
        Err(AppError::new(failure_kind, message))
    }
}

fn envelope(kind: ModuleKind, op: &str, data: Value) -> RequestEnvelope {
    RequestEnvelope::new(Some(kind.tag()), op, data)
}

/// POST /register
pub async fn register(
    State(state): State<ModulesAppState>,
    Json(req): Json<RegisterRequest>,
) -> ModuleResult<impl IntoResponse> {
    let outcome = state
        .onboarding
        .execute(OnboardingInput {
            email: req.email,
            password: req.password,
            language: req.language,
        })
        .await?;

    let response = RegisterResponse {
        user: UserResponse::from(&outcome.user),
        api_key: outcome.user.api_key.clone(),
        module_initializations: outcome.module_initializations,
        welcome_package: outcome.welcome_package,
        next_steps: outcome.next_steps,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /requests - generic envelope dispatch
pub async fn dispatch_request(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<DispatchResponse>, AppError> {
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /dashboard
pub async fn daily_dashboard(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
) -> ModuleResult<Json<DailyDashboard>> {
    let dashboard = state.dashboard.execute(current.0.as_ref()).await?;
    Ok(Json(dashboard))
}

/// POST /analysis/analyze-text
pub async fn analyze_text(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Json<AnalyzeTextResponse> {
    let text_hash = platform::crypto::sha256_hex(
        format!("{}:{}", current.0.user_id, req.text).as_bytes(),
    );
    let cache_key = format!("analysis:{text_hash}");

    if let Some(cached) = state.cache.get(&cache_key).await {
        if let Ok(results) = serde_json::from_str(&cached) {
            return Json(AnalyzeTextResponse {
                results,
                cached: true,
            });
        }
    }

    let results = state.analyzer.analyze(&req.text);
    if let Ok(serialized) = serde_json::to_string(&results) {
        state.cache.set(&cache_key, serialized, ANALYSIS_TTL).await;
    }
    Json(AnalyzeTextResponse {
        results,
        cached: false,
    })
}

/// POST /fard-ai/prayers
pub async fn mark_prayer(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<MarkPrayerRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::FardAi,
        "mark_prayer",
        json!({"prayer_name": req.prayer_name}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /fard-ai/learning-progress
pub async fn learning_progress(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(ModuleKind::FardAi, "get_learning_progress", json!({}));
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::NotFound)
}

/// POST /projects/audit
pub async fn audit_project(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AuditProjectRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::BaitulHikma,
        "audit_project",
        json!({
            "project_name": req.project_name,
            "description": req.description,
        }),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /projects/{project_id} - public
pub async fn project_details(
    State(state): State<ModulesAppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::BaitulHikma,
        "get_project_details",
        json!({"project_id": project_id}),
    );
    let outcome = state.dispatcher.process_request(None, envelope).await;
    respond(outcome, ErrorKind::NotFound)
}

/// POST /ar-rihla/sessions
pub async fn create_knowledge_session(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<KnowledgeSessionRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::ArRihla,
        "create_knowledge_session",
        json!({"topic": req.topic, "time": req.time}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /ar-rihla/sessions - public
pub async fn list_knowledge_sessions(
    State(state): State<ModulesAppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::ArRihla,
        "list_sessions",
        json!({"skip": page.skip, "limit": page.limit}),
    );
    let outcome = state.dispatcher.process_request(None, envelope).await;
    respond(outcome, ErrorKind::InternalServerError)
}

/// GET /waqfs - public
pub async fn list_waqfs(
    State(state): State<ModulesAppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::UmmahWaqf,
        "list_waqfs",
        json!({"skip": page.skip, "limit": page.limit}),
    );
    let outcome = state.dispatcher.process_request(None, envelope).await;
    respond(outcome, ErrorKind::InternalServerError)
}

/// POST /waqfs
pub async fn create_waqf(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<WaqfCreateRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::UmmahWaqf,
        "create_waqf",
        json!({
            "name": req.name,
            "category": req.category,
            "description": req.description,
            "yield_pa": req.yield_pa,
        }),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// POST /waqfs/{waqf_id}/donate
pub async fn donate(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Path(waqf_id): Path<i64>,
    Json(req): Json<DonationRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::UmmahWaqf,
        "donate",
        json!({"waqf_id": waqf_id, "amount": req.amount}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// POST /health/goals
pub async fn set_fitness_goal(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<FitnessGoalRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::SalamHealth,
        "set_fitness_goal",
        json!({
            "goal_type": req.goal_type,
            "target": req.target,
            "deadline": req.deadline,
        }),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /health/goals
pub async fn get_fitness_goals(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(ModuleKind::SalamHealth, "get_fitness_goals", json!({}));
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::InternalServerError)
}

/// PUT /health/goals/{goal_id}/progress
pub async fn update_goal_progress(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Path(goal_id): Path<i64>,
    Json(req): Json<GoalProgressRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::SalamHealth,
        "update_goal_progress",
        json!({"goal_id": goal_id, "progress_value": req.progress_value}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// POST /nutrition-halal/check-photo
pub async fn check_product_photo(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CheckPhotoRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::NutritionHalal,
        "check_product_photo",
        json!({"content": req.content, "filename": req.filename}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::UnprocessableEntity)
}

/// POST /jobs
pub async fn post_job(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<JobPostRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::CareerUmma,
        "post_job",
        json!({
            "title": req.title,
            "description": req.description,
            "company_name": req.company_name,
            "location": req.location,
            "is_remote": req.is_remote,
            "level": req.level,
        }),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /jobs - public
pub async fn search_jobs(
    State(state): State<ModulesAppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::CareerUmma,
        "search_jobs",
        json!({
            "query": query.query,
            "location": query.location,
            "level": query.level,
            "skip": query.skip,
            "limit": query.limit,
        }),
    );
    let outcome = state.dispatcher.process_request(None, envelope).await;
    respond(outcome, ErrorKind::InternalServerError)
}

/// POST /jobs/{vacancy_id}/apply
pub async fn apply_for_job(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Path(vacancy_id): Path<i64>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::CareerUmma,
        "apply_for_job",
        json!({"vacancy_id": vacancy_id}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::BadRequest)
}

/// GET /jobs/{vacancy_id}/applications - author only
pub async fn get_job_applications(
    State(state): State<ModulesAppState>,
    Extension(current): Extension<CurrentUser>,
    Path(vacancy_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<DispatchResponse>, AppError> {
    let envelope = envelope(
        ModuleKind::CareerUmma,
        "get_job_applications",
        json!({"vacancy_id": vacancy_id, "skip": page.skip, "limit": page.limit}),
    );
    let outcome = state
        .dispatcher
        .process_request(Some(current.0.as_ref()), envelope)
        .await;
    respond(outcome, ErrorKind::Forbidden)
}
