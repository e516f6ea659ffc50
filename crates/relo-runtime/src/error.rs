//! Runtime error types

use relo_core::{QuoteContext, RuleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone)]
pub enum RuntimeError {
    /// A module transform failed; the run was aborted
    #[error("Module '{module_id}' failed at position {position}: {source}")]
    ModuleFailed {
        module_id: String,
        position: usize,
        source: RuleError,
        /// Context as it was when the module was entered
        snapshot: Box<QuoteContext>,
    },
}

impl RuntimeError {
    pub fn module_id(&self) -> &str {
        match self {
            RuntimeError::ModuleFailed { module_id, .. } => module_id,
        }
    }

    pub fn snapshot(&self) -> &QuoteContext {
        match self {
            RuntimeError::ModuleFailed { snapshot, .. } => snapshot,
        }
    }

    /// Operator-facing description of the failure
    pub fn failure_report(&self) -> FailureReport {
        match self {
            RuntimeError::ModuleFailed {
                module_id,
                position,
                source,
                snapshot,
            } => FailureReport {
                module_id: module_id.clone(),
                position: *position,
                error: source.to_string(),
                snapshot: snapshot.as_ref().clone(),
            },
        }
    }
}

/// Serializable diagnosis of a failed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub module_id: String,
    pub position: usize,
    pub error: String,
    pub snapshot: QuoteContext,
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
