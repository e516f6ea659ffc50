//! Registry semantic analyzer
//!
//! Implements validation rules E001-E004 and warning W001 for a module registry.
//!
//! - E001: module ids must be unique
//! - E002: every dependency must name a registered module
//! - E003: a module cannot depend on itself
//! - E004: dependencies must not form a cycle
//! - W001: a module depends on a module with a higher priority value, so the
//!   dependency overrides raw priority ordering

use crate::error::{CompileError, Result};
use relo_core::RuleModule;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Warning diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Registry analyzer result
#[derive(Debug)]
struct AnalysisResult {
    errors: Vec<CompileError>,
    warnings: Vec<Warning>,
}

impl AnalysisResult {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn add_error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Warning {
            code: code.into(),
            message: message.into(),
        });
    }

    fn into_result(mut self) -> Result<Vec<Warning>> {
        match self.errors.len() {
            0 => Ok(self.warnings),
            1 => Err(self.errors.remove(0)),
            _ => Err(CompileError::Multiple(self.errors)),
        }
    }
}

/// Analyze a module set in registration order
pub fn analyze_registry(modules: &[Arc<dyn RuleModule>]) -> Result<Vec<Warning>> {
    let mut result = AnalysisResult::new();

    // E001: ids must be unique
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, module) in modules.iter().enumerate() {
        if index.insert(module.id(), i).is_some() {
            result.add_error(CompileError::DuplicateModule(module.id().to_string()));
        }
    }

    for module in modules {
        for dependency in module.dependencies() {
            // E003: self dependency
            if dependency == module.id() {
                result.add_error(CompileError::SelfDependency(module.id().to_string()));
                continue;
            }

            // E002: unknown dependency
            let Some(&dep_index) = index.get(dependency) else {
                result.add_error(CompileError::UnknownDependency {
                    module: module.id().to_string(),
                    dependency: dependency.to_string(),
                });
                continue;
            };

            // W001: dependency forces a higher priority value to run first
            let dep = &modules[dep_index];
            if dep.priority() > module.priority() {
                result.add_warning(
                    "W001",
                    format!(
                        "Module '{}' (priority {}) depends on '{}' (priority {}); the dependency overrides priority order",
                        module.id(),
                        module.priority(),
                        dep.id(),
                        dep.priority()
                    ),
                );
            }
        }
    }

    // E004: cycles
    if let Some(cycle) = find_cycle(modules) {
        result.add_error(CompileError::CircularDependency { cycle });
    }

    result.into_result()
}

/// Find a dependency cycle, returned as a closed path (`a -> b -> a`).
///
/// Self dependencies and unknown ids are ignored here; they have their own rules.
pub fn find_cycle(modules: &[Arc<dyn RuleModule>]) -> Option<Vec<String>> {
    let index: HashMap<&str, usize> = modules
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id(), i))
        .collect();

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    fn dfs<'a>(
        node: usize,
        modules: &'a [Arc<dyn RuleModule>],
        index: &HashMap<&'a str, usize>,
        visited: &mut HashSet<usize>,
        rec_stack: &mut HashSet<usize>,
        path: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(node);

        for dependency in modules[node].dependencies() {
            let Some(&next) = index.get(dependency) else {
                continue;
            };
            if next == node {
                continue;
            }

            if rec_stack.contains(&next) {
                // Cycle detected: close the path at the repeated node
                let start = path.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..]
                    .iter()
                    .map(|&n| modules[n].id().to_string())
                    .collect();
                cycle.push(modules[next].id().to_string());
                return Some(cycle);
            }

            if !visited.contains(&next) {
                if let Some(cycle) = dfs(next, modules, index, visited, rec_stack, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        rec_stack.remove(&node);
        None
    }

    for start in 0..modules.len() {
        if visited.contains(&start) {
            continue;
        }
        if let Some(cycle) = dfs(
            start,
            modules,
            &index,
            &mut visited,
            &mut rec_stack,
            &mut path,
        ) {
            return Some(cycle);
        }
    }

    None
}
