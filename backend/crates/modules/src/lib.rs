//! Modules - Domain Handlers and the Request Dispatcher
//!
//! The heart of the application: seven pluggable domain modules behind a
//! uniform contract, a startup-built registry, and the dispatcher that
//! routes typed request envelopes, owns the per-request database
//! transaction, and reconciles results with the in-process ledger.
//!
//! Structure:
//! - `domain/` - Envelope, module contract, recommendations
//! - `application/` - Dispatcher, onboarding, dashboard use cases
//! - `infra/` - OCR and text-analysis engine stubs
//! - `presentation/` - REST surface for every module
//! - One file per domain module at the crate root

pub mod application;
pub mod ar_rihla;
pub mod baitul_hikma;
pub mod career_umma;
pub mod domain;
pub mod error;
pub mod fard_ai;
pub mod infra;
pub mod nutrition_halal;
pub mod orchestrator;
pub mod presentation;
pub mod recommendations;
pub mod registry;
pub mod salam_health;
pub mod ummah_waqf;

// Re-exports for convenience
pub use application::dashboard::DashboardUseCase;
pub use application::dispatcher::{DispatchResponse, Dispatcher};
pub use application::onboarding::OnboardingUseCase;
pub use domain::contract::{DomainModule, ModuleKind, UserRef};
pub use domain::envelope::RequestEnvelope;
pub use error::{ModuleError, ModuleResult};
pub use presentation::router::modules_router;
pub use registry::{ModuleDeps, ModuleRegistry};

#[cfg(test)]
mod tests;
