//! Module registry
//!
//! The registry is the explicit, immutable catalog of rule modules a quote
//! engine is built from. Registration order is kept: it breaks priority ties.

use relo_core::RuleModule;
use std::fmt;
use std::sync::Arc;

/// Ordered collection of rule modules
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn RuleModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module (builder style)
    pub fn with_module(mut self, module: impl RuleModule + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Add a shared module
    pub fn register(&mut self, module: Arc<dyn RuleModule>) {
        self.modules.push(module);
    }

    pub fn extend<I>(&mut self, modules: I)
    where
        I: IntoIterator<Item = Arc<dyn RuleModule>>,
    {
        self.modules.extend(modules);
    }

    /// A copy of this registry without the given module ids
    pub fn without<S: AsRef<str>>(&self, ids: &[S]) -> Self {
        let modules = self
            .modules
            .iter()
            .filter(|m| !ids.iter().any(|id| id.as_ref() == m.id()))
            .cloned()
            .collect();
        Self { modules }
    }

    pub fn modules(&self) -> &[Arc<dyn RuleModule>] {
        &self.modules
    }

    pub fn ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.iter().any(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<Arc<dyn RuleModule>> for ModuleRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn RuleModule>>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.ids())
            .finish()
    }
}
