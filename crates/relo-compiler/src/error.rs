//! Compiler error types

use thiserror::Error;

/// Configuration error found while assembling the module registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Two modules share an id
    #[error("[E001] Duplicate module id: '{0}'")]
    DuplicateModule(String),

    /// A dependency names a module that is not registered
    #[error("[E002] Module '{module}' depends on unknown module '{dependency}'")]
    UnknownDependency { module: String, dependency: String },

    /// A module lists itself as a dependency
    #[error("[E003] Module '{0}' depends on itself")]
    SelfDependency(String),

    /// Dependencies form a cycle
    #[error("[E004] Circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Warnings were raised while the compiler was told to deny them
    #[error("Warnings denied: {}", .0.join("; "))]
    WarningsDenied(Vec<String>),

    /// Several errors at once
    #[error("{} configuration errors: {}", .0.len(), .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<CompileError>),
}

impl CompileError {
    /// Ids of the modules this error is about
    pub fn module_ids(&self) -> Vec<String> {
        match self {
            CompileError::DuplicateModule(id) | CompileError::SelfDependency(id) => {
                vec![id.clone()]
            }
            CompileError::UnknownDependency { module, .. } => vec![module.clone()],
            CompileError::CircularDependency { cycle } => {
                let mut ids: Vec<String> = Vec::new();
                for id in cycle {
                    if !ids.contains(id) {
                        ids.push(id.clone());
                    }
                }
                ids
            }
            CompileError::WarningsDenied(_) => Vec::new(),
            CompileError::Multiple(errors) => {
                errors.iter().flat_map(CompileError::module_ids).collect()
            }
        }
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
