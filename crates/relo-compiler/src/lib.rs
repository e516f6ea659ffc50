//! RELO Compiler - Module registry to execution plan
//!
//! This crate validates a module registry (duplicate ids, unknown or cyclic
//! dependencies) and compiles it into a deterministic execution plan.

pub mod analyzer;
pub mod compiler;
pub mod error;
pub mod plan;
pub mod registry;
pub mod scheduler;

// Re-export main types
pub use analyzer::Warning;
pub use compiler::{CompilerOptions, RegistryCompiler};
pub use error::{CompileError, Result};
pub use plan::{ExecutionPlan, PlanEntry, PlanSummary, PlannedModule};
pub use registry::ModuleRegistry;
