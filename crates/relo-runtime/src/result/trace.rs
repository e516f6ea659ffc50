//! Execution tracing types
//!
//! These structures record what every planned module did during one run:
//! whether it was skipped, applied without effect, or contributed entries.

use chrono::{DateTime, Utc};
use relo_core::ModuleEntries;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to a planned module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Predicate held and the accumulator changed
    Applied,
    /// Predicate held but the module returned an equivalent context
    NoEffect,
    /// Predicate was false; the module was not called
    Skipped,
}

/// Trace of a single module in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTrace {
    pub module_id: String,

    /// Position in the execution plan
    pub position: usize,

    pub status: ModuleStatus,

    #[serde(default)]
    pub costs_added: usize,

    #[serde(default)]
    pub requirements_added: usize,

    #[serde(default)]
    pub risks_added: usize,

    #[serde(default)]
    pub legal_impacts_added: usize,

    #[serde(default)]
    pub cross_sell_added: usize,

    /// Sum of the risk points the module contributed
    #[serde(default)]
    pub risk_points: f64,

    /// Time spent in the predicate and transform, in microseconds
    pub duration_us: u64,
}

impl ModuleTrace {
    /// Trace for a module whose predicate was false
    pub fn skipped(module_id: impl Into<String>, position: usize, duration_us: u64) -> Self {
        Self {
            module_id: module_id.into(),
            position,
            status: ModuleStatus::Skipped,
            costs_added: 0,
            requirements_added: 0,
            risks_added: 0,
            legal_impacts_added: 0,
            cross_sell_added: 0,
            risk_points: 0.0,
            duration_us,
        }
    }

    /// Trace for a module that ran, built from the entry count difference
    pub fn applied(
        module_id: impl Into<String>,
        position: usize,
        changed: bool,
        before: ModuleEntries,
        after: ModuleEntries,
        risk_points: f64,
        duration_us: u64,
    ) -> Self {
        Self {
            module_id: module_id.into(),
            position,
            status: if changed {
                ModuleStatus::Applied
            } else {
                ModuleStatus::NoEffect
            },
            costs_added: after.costs.saturating_sub(before.costs),
            requirements_added: after.requirements.saturating_sub(before.requirements),
            risks_added: after.risks.saturating_sub(before.risks),
            legal_impacts_added: after.legal_impacts.saturating_sub(before.legal_impacts),
            cross_sell_added: after.cross_sell.saturating_sub(before.cross_sell),
            risk_points,
            duration_us,
        }
    }
}

/// Trace of a whole pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTrace {
    /// Unique id of the run, also attached to log events
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// One entry per planned module, in execution order
    pub modules: Vec<ModuleTrace>,

    #[serde(default)]
    pub total_duration_us: u64,
}

impl PipelineTrace {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            modules: Vec::new(),
            total_duration_us: 0,
        }
    }

    pub fn push(&mut self, module: ModuleTrace) {
        self.modules.push(module);
    }

    /// Ids of modules that changed the accumulator, in execution order
    pub fn applied_ids(&self) -> Vec<&str> {
        self.ids_with(ModuleStatus::Applied)
    }

    pub fn skipped_ids(&self) -> Vec<&str> {
        self.ids_with(ModuleStatus::Skipped)
    }

    pub fn find(&self, module_id: &str) -> Option<&ModuleTrace> {
        self.modules.iter().find(|m| m.module_id == module_id)
    }

    fn ids_with(&self, status: ModuleStatus) -> Vec<&str> {
        self.modules
            .iter()
            .filter(|m| m.status == status)
            .map(|m| m.module_id.as_str())
            .collect()
    }
}
