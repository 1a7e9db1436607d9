//! Modules Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use ledger::{Ledger, LedgerConfig};
use sqlx::PgPool;
use users::presentation::middleware::{AuthMiddlewareState, require_api_key};
use users::{PgUsersRepository, UsersConfig};

use crate::application::dashboard::DashboardUseCase;
use crate::application::dispatcher::Dispatcher;
use crate::application::onboarding::OnboardingUseCase;
use crate::infra::analysis::TextAnalyzer;
use crate::presentation::handlers::{self, ModulesAppState};
use crate::registry::{ModuleDeps, ModuleRegistry};

/// Create the modules router: registry, dispatcher, and the REST surface
/// of every domain module
pub fn modules_router(
    pool: PgPool,
    ledger: Arc<Ledger>,
    ledger_config: LedgerConfig,
    repo: PgUsersRepository,
    users_config: UsersConfig,
    deps: ModuleDeps,
) -> Router {
    let registry = Arc::new(ModuleRegistry::standard(deps.clone()));
    let repo = Arc::new(repo);

    let state = ModulesAppState {
        dispatcher: Arc::new(Dispatcher::new(
            pool.clone(),
            registry.clone(),
            ledger,
            ledger_config,
        )),
        dashboard: Arc::new(DashboardUseCase::new(pool, registry.clone())),
        onboarding: Arc::new(OnboardingUseCase::new(
            repo.clone(),
            Arc::new(users_config),
            registry,
        )),
        analyzer: TextAnalyzer::new(),
        cache: deps.cache,
    };
    let auth_state = AuthMiddlewareState { repo };

    let public = Router::new()
        .route("/register", post(handlers::register))
        .route("/waqfs", get(handlers::list_waqfs))
        .route("/jobs", get(handlers::search_jobs))
        .route("/projects/{project_id}", get(handlers::project_details))
        .route("/ar-rihla/sessions", get(handlers::list_knowledge_sessions));

    let protected = Router::new()
        .route("/requests", post(handlers::dispatch_request))
        .route("/dashboard", get(handlers::daily_dashboard))
        .route("/analysis/analyze-text", post(handlers::analyze_text))
        .route("/fard-ai/prayers", post(handlers::mark_prayer))
        .route("/fard-ai/learning-progress", get(handlers::learning_progress))
        .route("/projects/audit", post(handlers::audit_project))
        .route("/ar-rihla/sessions", post(handlers::create_knowledge_session))
        .route("/waqfs", post(handlers::create_waqf))
        .route("/waqfs/{waqf_id}/donate", post(handlers::donate))
        .route("/health/goals", post(handlers::set_fitness_goal))
        .route("/health/goals", get(handlers::get_fitness_goals))
        .route(
            "/health/goals/{goal_id}/progress",
            put(handlers::update_goal_progress),
        )
        .route(
            "/nutrition-halal/check-photo",
            post(handlers::check_product_photo),
        )
        .route("/jobs", post(handlers::post_job))
        .route("/jobs/{vacancy_id}/apply", post(handlers::apply_for_job))
        .route(
            "/jobs/{vacancy_id}/applications",
            get(handlers::get_job_applications),
        )
        .layer(middleware::from_fn_with_state(
            auth_state,
            require_api_key::<PgUsersRepository>,
        ));

    public.merge(protected).with_state(state)
}
