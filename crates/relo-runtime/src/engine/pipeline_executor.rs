//! Pipeline executor
//!
//! Runs a compiled [`ExecutionPlan`] as a strict left fold: every module sees
//! the context produced by the modules before it and hands a new context to
//! the next one. Skipped modules leave the context untouched, a failing
//! module aborts the whole run.

use crate::error::{Result, RuntimeError};
use crate::observability::{Metrics, MetricsCollector};
use crate::result::{ExecutionResult, ModuleTrace, PipelineTrace};
use relo_compiler::ExecutionPlan;
use relo_core::{Accumulator, QuoteContext, RuleError};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Executor options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Build a [`PipelineTrace`] for every run
    pub collect_trace: bool,

    /// Record counters and timings in the metrics collector
    pub record_metrics: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            collect_trace: false,
            record_metrics: true,
        }
    }
}

/// Pipeline executor
///
/// Holds no per-run state, so one executor can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    options: ExecutorOptions,
    metrics: Arc<MetricsCollector>,
}

impl PipelineExecutor {
    /// Create a new pipeline executor with default options
    pub fn new() -> Self {
        Self::with_options(ExecutorOptions::default())
    }

    pub fn with_options(options: ExecutorOptions) -> Self {
        Self {
            options,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn options(&self) -> ExecutorOptions {
        self.options
    }

    /// Get metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Fold `plan` over `ctx` and return the final context.
    ///
    /// On failure the error carries the failing module and the context as it
    /// was when that module was entered; no partial result is returned.
    pub fn execute(&self, plan: &ExecutionPlan, ctx: QuoteContext) -> Result<ExecutionResult> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let span = tracing::debug_span!("quote_run", %run_id, modules = plan.len());
        let _enter = span.enter();

        if self.options.record_metrics {
            self.metrics.counter("quotes_total").inc();
        }

        let mut trace = self
            .options
            .collect_trace
            .then(|| PipelineTrace::new(run_id));
        let mut ctx = ctx;

        for (position, planned) in plan.iter().enumerate() {
            let module = planned.module();
            let module_start = Instant::now();

            if !module.is_applicable(&ctx) {
                tracing::debug!(module = module.id(), position, "module skipped");
                if self.options.record_metrics {
                    self.metrics.counter("modules_skipped_total").inc();
                }
                if let Some(trace) = trace.as_mut() {
                    trace.push(ModuleTrace::skipped(
                        module.id(),
                        position,
                        elapsed_us(module_start),
                    ));
                }
                continue;
            }

            let applied = module
                .apply(&ctx)
                .and_then(|next| verify_append_only(&ctx, next));
            let next = match applied {
                Ok(next) => next,
                Err(source) => return Err(self.fail(module.id(), position, source, ctx)),
            };

            let changed = next.revision() != ctx.revision();
            if let Some(trace) = trace.as_mut() {
                let before = entries(&ctx, module.id());
                let after = entries(&next, module.id());
                trace.push(ModuleTrace::applied(
                    module.id(),
                    position,
                    changed,
                    before,
                    after,
                    risk_points(&next, module.id()) - risk_points(&ctx, module.id()),
                    elapsed_us(module_start),
                ));
            }

            ctx = if changed {
                tracing::debug!(
                    module = module.id(),
                    position,
                    cost_total = next.cost_total(),
                    "module applied"
                );
                if self.options.record_metrics {
                    self.metrics.counter("modules_applied_total").inc();
                }
                next.with_activation(module.id())
            } else {
                tracing::debug!(module = module.id(), position, "module had no effect");
                next
            };
        }

        let duration = start_time.elapsed();
        if self.options.record_metrics {
            self.metrics.record_execution_time("quote_execution", duration);
        }
        tracing::debug!(
            activated = ctx.activated_modules().len(),
            duration_us = duration.as_micros() as u64,
            "quote run finished"
        );

        let mut result = ExecutionResult::new(ctx);
        if let Some(mut trace) = trace {
            trace.total_duration_us = duration.as_micros() as u64;
            result = result.with_trace(trace);
        }
        Ok(result)
    }

    fn fail(
        &self,
        module_id: &str,
        position: usize,
        source: RuleError,
        snapshot: QuoteContext,
    ) -> RuntimeError {
        tracing::error!(module = module_id, position, error = %source, "module failed, run aborted");
        if self.options.record_metrics {
            self.metrics.counter("quotes_failed").inc();
        }
        RuntimeError::ModuleFailed {
            module_id: module_id.to_string(),
            position,
            source,
            snapshot: Box::new(snapshot),
        }
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

fn entries(ctx: &QuoteContext, module_id: &str) -> relo_core::ModuleEntries {
    ctx.computed()
        .map(|acc| acc.entries_from(module_id))
        .unwrap_or_default()
}

fn risk_points(ctx: &QuoteContext, module_id: &str) -> f64 {
    ctx.computed().map_or(0.0, |acc| {
        acc.risks()
            .iter()
            .filter(|r| r.module_id == module_id)
            .map(|r| r.amount)
            .sum()
    })
}

/// Reject a context that changed the request or removed or edited earlier entries
fn verify_append_only(before: &QuoteContext, after: QuoteContext) -> relo_core::Result<QuoteContext> {
    // A rebuilt but equal request is still the same input
    let same_request = Arc::ptr_eq(&before.shared_request(), &after.shared_request())
        || before.request() == after.request();
    if !same_request {
        return Err(RuleError::InvalidState(
            "module replaced the quote request".to_string(),
        ));
    }

    let empty = Accumulator::default();
    let old = before.computed().unwrap_or(&empty);
    let new = after.computed().unwrap_or(&empty);

    let preserved = new.costs().starts_with(old.costs())
        && new.requirements().starts_with(old.requirements())
        && new.risks().starts_with(old.risks())
        && new.legal_impacts().starts_with(old.legal_impacts())
        && new.cross_sell_proposals().starts_with(old.cross_sell_proposals())
        && new.insurance_notes().starts_with(old.insurance_notes())
        && old.flags().is_subset(new.flags());
    if !preserved {
        return Err(RuleError::InvalidState(
            "module removed or edited existing accumulator entries".to_string(),
        ));
    }

    if new.activated_modules() != old.activated_modules() {
        return Err(RuleError::InvalidState(
            "module wrote to the activated-modules trail".to_string(),
        ));
    }

    Ok(after)
}
