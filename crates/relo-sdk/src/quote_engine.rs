//! QuoteEngine - Main API for computing quotes

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use relo_compiler::{CompilerOptions, ExecutionPlan, ModuleRegistry, RegistryCompiler};
use relo_core::{Accumulator, QuoteContext, QuoteRequest, RuleModule};
use relo_runtime::{
    ExecutorOptions, Metrics, MetricsCollector, MetricsSnapshot, PipelineExecutor, PipelineTrace,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of one quote computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOutcome {
    /// Final context: the request plus everything the modules added
    pub context: QuoteContext,

    /// Per-module trace, when tracing is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PipelineTrace>,
}

impl QuoteOutcome {
    /// Accumulated outputs; `None` when no module contributed anything
    pub fn accumulator(&self) -> Option<&Accumulator> {
        self.context.computed()
    }

    pub fn cost_total(&self) -> f64 {
        self.context.cost_total()
    }

    /// Raw risk sum; clamping is left to the consumer
    pub fn risk_total(&self) -> f64 {
        self.accumulator().map_or(0.0, Accumulator::risk_total)
    }

    pub fn activated_modules(&self) -> &[String] {
        self.context.activated_modules()
    }
}

/// Main quote engine
///
/// The plan is compiled once at assembly and shared read-only by every
/// request, so one engine can serve concurrent callers.
pub struct QuoteEngine {
    /// Compiled module order
    plan: ExecutionPlan,

    /// Pipeline executor
    executor: PipelineExecutor,

    /// Metrics collector
    metrics: Arc<MetricsCollector>,

    /// Configuration
    config: EngineConfig,
}

impl QuoteEngine {
    /// Create an engine running the standard catalog
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::assemble(config, true, Vec::new())
    }

    pub(crate) fn assemble(
        config: EngineConfig,
        include_standard: bool,
        extra_modules: Vec<Arc<dyn RuleModule>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut registry = if include_standard {
            relo_rules::standard_registry(&config.rules)
        } else {
            ModuleRegistry::new()
        };
        registry.extend(extra_modules);

        for id in &config.disabled_modules {
            if !registry.contains(id) {
                return Err(SdkError::ConfigError(format!(
                    "Cannot disable unknown module '{}'",
                    id
                )));
            }
        }
        let registry = registry.without(config.disabled_modules.as_slice());

        let compiler = RegistryCompiler::with_options(CompilerOptions {
            deny_warnings: config.deny_warnings,
        });
        let plan = compiler.compile(&registry)?;

        let metrics = Arc::new(MetricsCollector::new());
        let executor = PipelineExecutor::with_options(ExecutorOptions {
            collect_trace: config.enable_tracing,
            record_metrics: config.enable_metrics,
        })
        .with_metrics(metrics.clone());

        tracing::info!(
            modules = plan.len(),
            disabled = config.disabled_modules.len(),
            warnings = plan.warnings().len(),
            "Quote engine assembled"
        );

        Ok(Self {
            plan,
            executor,
            metrics,
            config,
        })
    }

    /// Compute a quote
    pub fn compute(&self, request: QuoteRequest) -> Result<QuoteOutcome> {
        self.compute_shared(Arc::new(request))
    }

    /// Compute a quote for a request the caller keeps a handle to
    pub fn compute_shared(&self, request: Arc<QuoteRequest>) -> Result<QuoteOutcome> {
        if let Err(e) = request.validate() {
            if self.config.enable_metrics {
                self.metrics.record_error("invalid_request");
            }
            return Err(SdkError::InvalidRequest(e.to_string()));
        }

        let result = self
            .executor
            .execute(&self.plan, QuoteContext::from_shared(request))?;

        Ok(QuoteOutcome {
            context: result.context,
            trace: result.trace,
        })
    }

    /// Get the compiled plan
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Module ids in execution order
    pub fn module_ids(&self) -> Vec<&str> {
        self.plan.module_ids()
    }

    /// Get metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Current counters and timing summaries
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zero every counter and histogram
    pub fn reset_metrics(&self) {
        self.metrics.reset_all();
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relo_core::ServiceType;

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QuoteEngine>();
    }

    #[test]
    fn test_unknown_disabled_module_is_rejected() {
        let err = QuoteEngine::new(EngineConfig::new().disable_module("teleport"))
            .err()
            .unwrap();
        assert!(matches!(err, SdkError::ConfigError(_)));
        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn test_disabling_a_dependency_fails_compilation() {
        let err = QuoteEngine::new(EngineConfig::new().disable_module("elevator_floor_constraint"))
            .err()
            .unwrap();
        match err {
            SdkError::CompileError(compile) => {
                assert!(compile.to_string().contains("elevator_floor_constraint"));
            }
            other => panic!("Expected CompileError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_request_is_rejected_before_running() {
        let engine = QuoteEngine::new(EngineConfig::new()).unwrap();
        let err = engine
            .compute(QuoteRequest::new(ServiceType::Moving).with_volume(-3.0))
            .unwrap_err();

        assert!(matches!(err, SdkError::InvalidRequest(_)));
        assert_eq!(engine.metrics().counter("quotes_total").get(), 0);
        assert_eq!(engine.metrics().counter("errors_invalid_request").get(), 1);
    }

    #[test]
    fn test_metrics_snapshot_and_reset() {
        let engine = QuoteEngine::new(EngineConfig::new()).unwrap();
        engine
            .compute(QuoteRequest::new(ServiceType::Moving).with_volume(15.0))
            .unwrap();
        engine
            .compute(QuoteRequest::new(ServiceType::Cleaning))
            .unwrap();

        let snapshot = engine.metrics_snapshot();
        assert_eq!(snapshot.counter("quotes_total"), 2);
        assert_eq!(snapshot.counter("quotes_failed"), 0);
        assert_eq!(snapshot.histograms["quote_execution_duration"].count, 2);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["counters"]["quotes_total"], 2);

        engine.reset_metrics();
        let snapshot = engine.metrics_snapshot();
        assert_eq!(snapshot.counter("quotes_total"), 0);
        assert_eq!(snapshot.histograms["quote_execution_duration"].count, 0);
    }
}
