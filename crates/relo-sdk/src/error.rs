//! SDK error types

use relo_runtime::FailureReport;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Compiler error
    #[error("Compiler error: {0}")]
    CompileError(#[from] relo_compiler::CompileError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] relo_runtime::RuntimeError),

    /// The request failed validation before any module ran
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Logging setup error
    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl SdkError {
    /// Message safe to show to the end customer
    pub fn user_message(&self) -> &'static str {
        match self {
            SdkError::InvalidRequest(_) => "quote request is invalid",
            _ => "quote could not be computed",
        }
    }

    /// Diagnosis of a failed run, for operators
    pub fn failure(&self) -> Option<FailureReport> {
        match self {
            SdkError::RuntimeError(err) => Some(err.failure_report()),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use relo_core::{QuoteContext, QuoteRequest, RuleError, ServiceType};
    use relo_runtime::RuntimeError;

    #[test]
    fn test_config_error() {
        let error = SdkError::ConfigError("Invalid configuration".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("Invalid configuration"));
        assert!(error.failure().is_none());
    }

    #[test]
    fn test_runtime_error_hides_details_from_users() {
        let runtime = RuntimeError::ModuleFailed {
            module_id: "temporary_storage".to_string(),
            position: 9,
            source: RuleError::InvalidState("no duration".to_string()),
            snapshot: Box::new(QuoteContext::new(QuoteRequest::new(ServiceType::Moving))),
        };
        let error: SdkError = runtime.into();

        assert_eq!(error.user_message(), "quote could not be computed");
        assert!(!error.user_message().contains("temporary_storage"));

        let report = error.failure().unwrap();
        assert_eq!(report.module_id, "temporary_storage");
        assert_eq!(report.position, 9);
    }

    #[test]
    fn test_compile_error_conversion() {
        let compile = relo_compiler::CompileError::DuplicateModule("heavy_items".to_string());
        let error: SdkError = compile.into();
        assert!(error.to_string().contains("Compiler error"));
        assert!(error.to_string().contains("heavy_items"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sdk_error: SdkError = io_error.into();
        assert!(sdk_error.to_string().contains("I/O error"));
        assert!(sdk_error.to_string().contains("File not found"));
    }

    #[test]
    fn test_invalid_request_message() {
        let error = SdkError::InvalidRequest("volume_m3 must not be negative".to_string());
        assert_eq!(error.user_message(), "quote request is invalid");
    }
}
