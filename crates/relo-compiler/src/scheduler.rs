//! Dependency-aware scheduling
//!
//! Topological sort (Kahn) over the dependency graph where edges point from a
//! dependency to its dependents. Among the modules whose dependencies are all
//! placed, the lowest `(priority, registration index)` goes next, so the order
//! is fully determined by the registry.

use crate::analyzer::find_cycle;
use crate::error::{CompileError, Result};
use relo_core::RuleModule;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

/// Execution order as indices into `modules`
pub fn schedule(modules: &[Arc<dyn RuleModule>]) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = modules
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id(), i))
        .collect();

    let mut in_degree = vec![0usize; modules.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); modules.len()];

    for (i, module) in modules.iter().enumerate() {
        let mut seen = Vec::new();
        for dependency in module.dependencies() {
            let dep = *index
                .get(dependency)
                .ok_or_else(|| CompileError::UnknownDependency {
                    module: module.id().to_string(),
                    dependency: dependency.to_string(),
                })?;
            // Listing the same dependency twice is one edge
            if seen.contains(&dep) {
                continue;
            }
            seen.push(dep);
            in_degree[i] += 1;
            dependents[dep].push(i);
        }
    }

    // BinaryHeap is a max-heap; Reverse pops the lowest (priority, index) first
    let mut ready: BinaryHeap<Reverse<(i32, usize)>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| Reverse((modules[i].priority(), i)))
        .collect();

    let mut order = Vec::with_capacity(modules.len());
    while let Some(Reverse((_, i))) = ready.pop() {
        order.push(i);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse((modules[dependent].priority(), dependent)));
            }
        }
    }

    if order.len() < modules.len() {
        let cycle = find_cycle(modules).unwrap_or_else(|| {
            in_degree
                .iter()
                .enumerate()
                .filter(|(_, degree)| **degree > 0)
                .map(|(i, _)| modules[i].id().to_string())
                .collect()
        });
        return Err(CompileError::CircularDependency { cycle });
    }

    Ok(order)
}
