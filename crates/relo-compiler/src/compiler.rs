//! Registry compiler
//!
//! Turns a [`ModuleRegistry`] into an [`ExecutionPlan`]: semantic analysis
//! first, then scheduling, then dependency resolution to plan positions.

use crate::analyzer::analyze_registry;
use crate::error::{CompileError, Result};
use crate::plan::{ExecutionPlan, PlannedModule};
use crate::registry::ModuleRegistry;
use crate::scheduler::schedule;
use std::collections::HashMap;
use std::sync::Arc;

/// Compiler options
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Treat analyzer warnings as errors
    pub deny_warnings: bool,
}

/// Compiles module registries into execution plans
#[derive(Debug, Clone, Default)]
pub struct RegistryCompiler {
    options: CompilerOptions,
}

impl RegistryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Validate and order the registry. Fails on the first configuration error set.
    pub fn compile(&self, registry: &ModuleRegistry) -> Result<ExecutionPlan> {
        let modules = registry.modules();

        let warnings = analyze_registry(modules).map_err(|e| {
            tracing::error!("Module registry rejected: {}", e);
            e
        })?;

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        if self.options.deny_warnings && !warnings.is_empty() {
            return Err(CompileError::WarningsDenied(
                warnings.iter().map(ToString::to_string).collect(),
            ));
        }

        let order = schedule(modules)?;

        // registration index -> plan position
        let positions: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(position, &registration)| (registration, position))
            .collect();
        let index: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id(), i))
            .collect();

        let mut planned = Vec::with_capacity(order.len());
        for &registration in &order {
            let module = &modules[registration];
            let mut dependencies: Vec<usize> = module
                .dependencies()
                .into_iter()
                .filter_map(|dep| index.get(dep))
                .filter_map(|dep_registration| positions.get(dep_registration).copied())
                .collect();
            dependencies.sort_unstable();
            dependencies.dedup();

            planned.push(PlannedModule::new(
                Arc::clone(module),
                registration,
                dependencies,
            ));
        }

        let plan = ExecutionPlan::new(planned, warnings);
        tracing::info!(
            modules = plan.len(),
            warnings = plan.warnings().len(),
            "Compiled module registry"
        );
        tracing::debug!("Execution order: {}", plan.module_ids().join(" -> "));

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relo_core::FnRule;

    #[test]
    fn test_compile_resolves_dependency_positions() {
        let registry = ModuleRegistry::new()
            .with_module(FnRule::noop("late", 50))
            .with_module(FnRule::noop("a", 10))
            .with_module(FnRule::noop("b", 5).depends_on("a"));

        let plan = RegistryCompiler::new().compile(&registry).unwrap();

        assert_eq!(plan.module_ids(), vec!["a", "b", "late"]);
        let b = &plan.modules()[1];
        assert_eq!(b.dependencies(), &[0]);
        assert_eq!(b.registration_index(), 2);
        assert_eq!(plan.position("late"), Some(2));
        assert_eq!(plan.warnings().len(), 1);
    }

    #[test]
    fn test_deny_warnings() {
        let registry = ModuleRegistry::new()
            .with_module(FnRule::noop("a", 10))
            .with_module(FnRule::noop("b", 5).depends_on("a"));

        let compiler = RegistryCompiler::with_options(CompilerOptions {
            deny_warnings: true,
        });
        let err = compiler.compile(&registry).unwrap_err();
        assert!(matches!(err, CompileError::WarningsDenied(ref w) if w.len() == 1));
    }

    #[test]
    fn test_compile_rejects_broken_registry() {
        let registry = ModuleRegistry::new()
            .with_module(FnRule::noop("a", 1).depends_on("b"))
            .with_module(FnRule::noop("b", 2).depends_on("a"));

        let err = RegistryCompiler::new().compile(&registry).unwrap_err();
        assert!(matches!(err, CompileError::CircularDependency { .. }));
    }

    #[test]
    fn test_summary_lists_dependencies_by_id() {
        let registry = ModuleRegistry::new()
            .with_module(FnRule::noop("a", 1))
            .with_module(FnRule::noop("b", 2).depends_on("a"));

        let summary = RegistryCompiler::new().compile(&registry).unwrap().summary();
        assert_eq!(summary.modules.len(), 2);
        assert_eq!(summary.modules[1].dependencies, vec!["a".to_string()]);
        assert!(summary.warnings.is_empty());
    }
}
