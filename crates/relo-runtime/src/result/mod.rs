//! Execution result types

mod trace;

pub use trace::{ModuleStatus, ModuleTrace, PipelineTrace};

use relo_core::QuoteContext;
use serde::{Deserialize, Serialize};

/// Outcome of folding a plan over one context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Final context
    pub context: QuoteContext,

    /// Per-module trace, when tracing is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PipelineTrace>,
}

impl ExecutionResult {
    pub fn new(context: QuoteContext) -> Self {
        Self {
            context,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: PipelineTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn into_context(self) -> QuoteContext {
        self.context
    }
}
