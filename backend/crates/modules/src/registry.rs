//! Module Registry
//!
//! Built once at startup; the dispatcher resolves modules from it by kind.
//! Registration order follows [`ModuleKind::ALL`] so dashboard aggregation
//! stays deterministic.

use std::collections::HashMap;
use std::sync::Arc;

use platform::cache::MemoryCache;

use crate::ar_rihla::ArRihlaModule;
use crate::baitul_hikma::BaitulHikmaModule;
use crate::career_umma::CareerUmmaModule;
use crate::domain::contract::{DomainModule, ModuleKind};
use crate::fard_ai::FardAiModule;
use crate::infra::ocr::{OcrEngine, StubOcrEngine};
use crate::nutrition_halal::NutritionHalalModule;
use crate::salam_health::SalamHealthModule;
use crate::ummah_waqf::UmmahWaqfModule;

/// Shared collaborators handed to modules at construction time
#[derive(Clone)]
pub struct ModuleDeps {
    pub cache: MemoryCache,
    pub ocr: Arc<dyn OcrEngine>,
}

impl Default for ModuleDeps {
    fn default() -> Self {
        Self {
            cache: MemoryCache::new(),
            ocr: Arc::new(StubOcrEngine),
        }
    }
}

/// The startup-built module registry
pub struct ModuleRegistry {
    modules: HashMap<ModuleKind, Arc<dyn DomainModule>>,
}

impl ModuleRegistry {
    /// Build the standard registry holding all seven modules
    pub fn standard(deps: ModuleDeps) -> Self {
        let mut builder = RegistryBuilder::default();
        builder.register(Arc::new(FardAiModule));
        builder.register(Arc::new(BaitulHikmaModule));
        builder.register(Arc::new(ArRihlaModule));
        builder.register(Arc::new(UmmahWaqfModule));
        builder.register(Arc::new(SalamHealthModule));
        builder.register(Arc::new(NutritionHalalModule::new(
            deps.ocr.clone(),
            deps.cache.clone(),
        )));
        builder.register(Arc::new(CareerUmmaModule));
        builder.build()
    }

    /// Start an empty registry builder (tests, partial deployments)
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve a module by kind
    pub fn get(&self, kind: ModuleKind) -> Option<&Arc<dyn DomainModule>> {
        self.modules.get(&kind)
    }

    /// Iterate modules in [`ModuleKind::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DomainModule>> {
        ModuleKind::ALL.iter().filter_map(|kind| self.modules.get(kind))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Builder collecting modules before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    modules: HashMap<ModuleKind, Arc<dyn DomainModule>>,
}

impl RegistryBuilder {
    /// Register a module under its own kind; the last registration wins
    pub fn register(&mut self, module: Arc<dyn DomainModule>) -> &mut Self {
        self.modules.insert(module.kind(), module);
        self
    }

    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry {
            modules: self.modules,
        }
    }
}
