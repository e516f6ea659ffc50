//! Error types for RELO Core

use thiserror::Error;

/// Error raised by a rule module or by the accumulator guards.
///
/// Every variant is an invalid-state error: the input reaching the module is
/// contradictory or was not sanitized upstream. It is fatal for the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Risk amount {amount} from module '{module_id}' is outside 0..=100")]
    RiskOutOfRange { module_id: String, amount: f64 },
}

impl RuleError {
    /// Shorthand for an [`RuleError::InvalidValue`]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
