//! RELO Runtime - Execution engine for compiled module plans
//!
//! This crate folds an [`ExecutionPlan`](relo_compiler::ExecutionPlan) over a
//! quote context, one module at a time, and reports what every module did.

pub mod engine;
pub mod error;
pub mod observability;
pub mod result;

// Re-export main types
pub use engine::{ExecutorOptions, PipelineExecutor};
pub use error::{FailureReport, Result, RuntimeError};
pub use observability::{
    Counter, Histogram, HistogramSummary, Metrics, MetricsCollector, MetricsSnapshot,
};
pub use result::{ExecutionResult, ModuleStatus, ModuleTrace, PipelineTrace};
