//! Onboarding Use Case
//!
//! Registration orchestration: create the account, let every module
//! produce its initial state, and assemble the welcome package. A module
//! that fails to initialize is skipped with a warning; registration itself
//! is never blocked by a single module.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use users::application::{CreateUserInput, CreateUserUseCase};
use users::{User, UserRepository, UsersConfig, UsersError};

use crate::domain::contract::ModuleKind;
use crate::error::{ModuleError, ModuleResult};
use crate::registry::ModuleRegistry;

/// Baraka rewards for the suggested first steps
const INITIAL_TASKS: &[(&str, u64)] = &[
    ("Complete your profile", 10),
    ("Explore one module", 20),
    ("Finish your first activity", 30),
];

/// Suggested actions after registration
const NEXT_STEPS: &[&str] = &[
    "complete_profile",
    "setup_preferences",
    "explore_modules",
    "join_community",
];

/// Onboarding input
#[derive(Debug, Clone)]
pub struct OnboardingInput {
    pub email: String,
    pub password: String,
    pub language: Option<String>,
}

/// Everything a fresh account receives
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomePackage {
    pub welcome_message: String,
    pub initial_tasks: Vec<InitialTask>,
    pub available_modules: Vec<ModuleSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialTask {
    pub task: String,
    pub baraka_reward: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub module: ModuleKind,
    pub description: &'static str,
}

/// Onboarding outcome handed back to the HTTP layer
#[derive(Debug)]
pub struct OnboardingOutcome {
    pub user: User,
    /// Initial state per module that initialized cleanly
    pub module_initializations: Map<String, Value>,
    pub welcome_package: WelcomePackage,
    pub next_steps: Vec<&'static str>,
}

/// Onboarding Use Case
pub struct OnboardingUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
    registry: Arc<ModuleRegistry>,
}

impl<R> OnboardingUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>, registry: Arc<ModuleRegistry>) -> Self {
        Self {
            repo,
            config,
            registry,
        }
    }

    pub async fn execute(&self, input: OnboardingInput) -> ModuleResult<OnboardingOutcome> {
        let create = CreateUserUseCase::new(self.repo.clone(), self.config.clone());
        let user = create
            .execute(CreateUserInput {
                email: input.email,
                password: input.password,
                language: input.language,
            })
            .await
            .map_err(user_creation_error)?;

        let mut module_initializations = Map::new();
        for module in self.registry.iter() {
            match module.initialize(&user).await {
                Ok(state) => {
                    module_initializations.insert(module.kind().tag().to_string(), state);
                }
                Err(err) => {
                    tracing::warn!(
                        module = %module.kind(),
                        error = %err,
                        "Module failed to initialize for a new user"
                    );
                }
            }
        }

        tracing::info!(
            public_id = %user.public_id,
            modules = module_initializations.len(),
            "User onboarded"
        );

        Ok(OnboardingOutcome {
            welcome_package: welcome_package(&user),
            user,
            module_initializations,
            next_steps: NEXT_STEPS.to_vec(),
        })
    }
}

fn welcome_package(user: &User) -> WelcomePackage {
    let welcome_message = format!(
        "Assalamu alaykum! Welcome to MubarakAI, a universal platform for \
         the modern Muslim. Your starting baraka balance is {}.",
        user.baraka_points
    );

    WelcomePackage {
        welcome_message,
        initial_tasks: INITIAL_TASKS
            .iter()
            .map(|(task, baraka_reward)| InitialTask {
                task: (*task).to_string(),
                baraka_reward: *baraka_reward,
            })
            .collect(),
        available_modules: ModuleKind::ALL
            .iter()
            .map(|kind| ModuleSummary {
                module: *kind,
                description: kind.description(),
            })
            .collect(),
    }
}

/// Keep cooperative users failures readable; collapse the rest
fn user_creation_error(err: UsersError) -> ModuleError {
    match err {
        UsersError::Database(e) => ModuleError::Database(e),
        UsersError::Internal(msg) => ModuleError::Internal(msg),
        other => ModuleError::domain(other.to_string()),
    }
}
