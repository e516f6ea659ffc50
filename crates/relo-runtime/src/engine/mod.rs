//! Execution engine module
//!
//! Provides the executor that folds a compiled plan over a quote context.

pub mod pipeline_executor;

// Re-export for convenience
pub use pipeline_executor::{ExecutorOptions, PipelineExecutor};
