//! Application Layer - Use Cases

pub mod dashboard;
pub mod dispatcher;
pub mod onboarding;

pub use dashboard::DashboardUseCase;
pub use dispatcher::{DispatchResponse, Dispatcher};
pub use onboarding::OnboardingUseCase;
