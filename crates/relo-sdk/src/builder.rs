//! Builder pattern for QuoteEngine

use crate::config::EngineConfig;
use crate::error::Result;
use crate::quote_engine::QuoteEngine;
use relo_core::RuleModule;
use relo_rules::RuleCatalogConfig;
use std::path::Path;
use std::sync::Arc;

/// Builder for QuoteEngine
///
/// # Example
///
/// ```rust,ignore
/// use relo_sdk::{QuoteEngineBuilder, RuleCatalogConfig};
///
/// // Standard catalog with default tunables
/// let engine = QuoteEngineBuilder::new().build()?;
///
/// // From a YAML configuration file
/// let engine = QuoteEngineBuilder::new()
///     .with_config_file("config/relo.yaml")?
///     .build()?;
///
/// // Extra house rules next to the standard catalog
/// let engine = QuoteEngineBuilder::new()
///     .add_module(my_rule)
///     .disable_module("packing_cross_sell")
///     .build()?;
/// ```
pub struct QuoteEngineBuilder {
    config: EngineConfig,
    include_standard: bool,
    extra_modules: Vec<Arc<dyn RuleModule>>,
}

impl QuoteEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            include_standard: true,
            extra_modules: Vec::new(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a YAML file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = EngineConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the catalog tunables
    pub fn with_rules(mut self, rules: RuleCatalogConfig) -> Self {
        self.config.rules = rules;
        self
    }

    /// Remove a standard module by id
    pub fn disable_module(mut self, id: impl Into<String>) -> Self {
        self.config.disabled_modules.push(id.into());
        self
    }

    /// Register an additional module after the standard catalog
    pub fn add_module(mut self, module: impl RuleModule + 'static) -> Self {
        self.extra_modules.push(Arc::new(module));
        self
    }

    /// Register an additional shared module
    pub fn add_shared_module(mut self, module: Arc<dyn RuleModule>) -> Self {
        self.extra_modules.push(module);
        self
    }

    /// Build an engine from the added modules only
    pub fn without_standard_catalog(mut self) -> Self {
        self.include_standard = false;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Enable tracing
    pub fn enable_tracing(mut self, enable: bool) -> Self {
        self.config.enable_tracing = enable;
        self
    }

    /// Fail the build on analyzer warnings
    pub fn deny_warnings(mut self, deny: bool) -> Self {
        self.config.deny_warnings = deny;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<QuoteEngine> {
        QuoteEngine::assemble(self.config, self.include_standard, self.extra_modules)
    }
}

impl Default for QuoteEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
