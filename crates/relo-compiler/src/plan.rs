//! Execution plan
//!
//! The compiled, validated form of a module registry. Dependencies are
//! resolved to plan positions once, so executing a plan never looks ids up.

use crate::analyzer::Warning;
use relo_core::{RuleModule, Trigger};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A module at its place in the execution order
#[derive(Clone)]
pub struct PlannedModule {
    module: Arc<dyn RuleModule>,
    registration_index: usize,
    dependencies: Vec<usize>,
}

impl PlannedModule {
    pub(crate) fn new(
        module: Arc<dyn RuleModule>,
        registration_index: usize,
        dependencies: Vec<usize>,
    ) -> Self {
        Self {
            module,
            registration_index,
            dependencies,
        }
    }

    pub fn module(&self) -> &dyn RuleModule {
        self.module.as_ref()
    }

    pub fn id(&self) -> &str {
        self.module.id()
    }

    /// Position in the registry the module was compiled from
    pub fn registration_index(&self) -> usize {
        self.registration_index
    }

    /// Plan positions of this module's dependencies (all smaller than its own)
    pub fn dependencies(&self) -> &[usize] {
        &self.dependencies
    }
}

/// Immutable, ordered module list shared by every request
#[derive(Clone, Default)]
pub struct ExecutionPlan {
    modules: Vec<PlannedModule>,
    warnings: Vec<Warning>,
}

impl ExecutionPlan {
    pub(crate) fn new(modules: Vec<PlannedModule>, warnings: Vec<Warning>) -> Self {
        Self { modules, warnings }
    }

    pub fn modules(&self) -> &[PlannedModule] {
        &self.modules
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module ids in execution order
    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.iter().map(PlannedModule::id).collect()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id() == id)
    }

    /// Analyzer warnings raised while compiling
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn summary(&self) -> PlanSummary {
        let entries = self
            .modules
            .iter()
            .enumerate()
            .map(|(position, planned)| PlanEntry {
                position,
                id: planned.id().to_string(),
                priority: planned.module().priority(),
                trigger: planned.module().trigger(),
                dependencies: planned
                    .dependencies()
                    .iter()
                    .map(|&p| self.modules[p].id().to_string())
                    .collect(),
            })
            .collect();

        PlanSummary {
            modules: entries,
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Debug for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionPlan")
            .field("order", &self.module_ids())
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Serializable description of a plan, for audit and operator tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub modules: Vec<PlanEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub position: usize,
    pub id: String,
    pub priority: i32,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}
