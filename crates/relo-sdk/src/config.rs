//! Configuration types for QuoteEngine

use crate::error::{Result, SdkError};
use relo_rules::RuleCatalogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main engine configuration
///
/// ```yaml
/// enable_metrics: true
/// enable_tracing: false
/// disabled_modules:
///   - packing_cross_sell
/// rules:
///   weekend_surcharge_percent: 7.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Build a per-module trace for every quote
    pub enable_tracing: bool,

    /// Reject registries that produce analyzer warnings
    pub deny_warnings: bool,

    /// Standard modules removed before compilation
    pub disabled_modules: Vec<String>,

    /// Tunables of the standard rule catalog
    pub rules: RuleCatalogConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            enable_metrics: true,
            enable_tracing: false,
            deny_warnings: false,
            disabled_modules: Vec::new(),
            rules: RuleCatalogConfig::default(),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading engine configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check the catalog tunables
    pub fn validate(&self) -> Result<()> {
        self.rules
            .validate()
            .map_err(|e| SdkError::ConfigError(e.to_string()))
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Enable tracing
    pub fn enable_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    /// Remove a standard module from the catalog
    pub fn disable_module(mut self, id: impl Into<String>) -> Self {
        self.disabled_modules.push(id.into());
        self
    }

    /// Replace the catalog tunables
    pub fn with_rules(mut self, rules: RuleCatalogConfig) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
