//! Provider registry for runtime provider lookup.
//!
//! A kind-indexed registry of boxed providers. Constructed once per process
//! and handed to the dispatcher; never mutated while serving requests.

use std::collections::HashMap;

use shopgen_types::llm::ProviderKind;

use super::box_provider::BoxContentProvider;

/// Registry of configured providers, indexed by vendor.
///
/// A vendor without credentials is simply absent; lookups for it return
/// `None` and the dispatcher treats that as a configuration failure.
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, BoxContentProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under its own kind, replacing any previous one.
    pub fn register(&mut self, provider: BoxContentProvider) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&BoxContentProvider> {
        self.providers.get(&kind)
    }

    /// Registered kinds in a stable order.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self.providers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
