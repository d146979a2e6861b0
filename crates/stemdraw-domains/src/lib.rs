//! # Stemdraw Domains
//!
//! One rendering backend per STEM domain. Each module validates the
//! domain-specific structure of a plan (feeding the quality score) and
//! renders it into artifacts: SVG always, plus LaTeX for circuits and
//! free-body diagrams and graph JSON for pathways and software
//! structure. Symbols come from the primitive library with a
//! procedural fallback.

use std::sync::Arc;

use stemdraw_core::DomainModule;
use stemdraw_primitives::PrimitiveStore;

mod biology;
mod chemistry;
mod circuit;
mod mechanics;
mod render;
mod software;

pub use biology::BiologyModule;
pub use chemistry::ChemistryModule;
pub use circuit::CircuitModule;
pub use mechanics::MechanicsModule;
pub use software::SoftwareModule;

/// The full module set, one per supported domain.
pub fn default_modules(store: Arc<dyn PrimitiveStore>) -> Vec<Arc<dyn DomainModule>> {
    vec![
        Arc::new(CircuitModule::new(store.clone())),
        Arc::new(MechanicsModule::new(store.clone())),
        Arc::new(ChemistryModule::new(store.clone())),
        Arc::new(BiologyModule::new(store.clone())),
        Arc::new(SoftwareModule::new(store)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use stemdraw_primitives::InMemoryPrimitiveStore;

    #[test]
    fn one_module_per_domain() {
        let store: Arc<dyn PrimitiveStore> = Arc::new(InMemoryPrimitiveStore::new());
        let modules = default_modules(store);
        assert_eq!(modules.len(), 5);
        let domains: HashSet<_> = modules.iter().map(|m| m.domain()).collect();
        assert_eq!(domains.len(), 5);
    }
}
