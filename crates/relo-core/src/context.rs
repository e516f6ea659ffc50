//! Quote context
//!
//! The context couples the caller's request with the accumulator of module
//! outputs. Modules receive a shared reference and return a new context; the
//! request itself is behind an `Arc`, so deriving a context only copies the
//! accumulator.

use crate::accumulator::{Accumulator, CostCategory, RequirementType, Signals};
use crate::error::Result;
use crate::request::QuoteRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-request record threaded through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteContext {
    request: Arc<QuoteRequest>,

    /// Created on the first contribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    computed: Option<Accumulator>,
}

impl QuoteContext {
    /// Create a context with an empty accumulator slot
    pub fn new(request: QuoteRequest) -> Self {
        Self::from_shared(Arc::new(request))
    }

    pub fn from_shared(request: Arc<QuoteRequest>) -> Self {
        Self {
            request,
            computed: None,
        }
    }

    pub fn request(&self) -> &QuoteRequest {
        &self.request
    }

    pub fn shared_request(&self) -> Arc<QuoteRequest> {
        Arc::clone(&self.request)
    }

    /// The accumulator, if any module has contributed yet
    pub fn computed(&self) -> Option<&Accumulator> {
        self.computed.as_ref()
    }

    /// Derive a new context whose accumulator has been extended by `f`.
    ///
    /// `self` is left untouched. If `f` fails, no context is produced.
    pub fn with_accumulator<F>(&self, f: F) -> Result<QuoteContext>
    where
        F: FnOnce(&mut Accumulator) -> Result<()>,
    {
        let mut accumulator = self.computed.clone().unwrap_or_default();
        f(&mut accumulator)?;
        Ok(QuoteContext {
            request: Arc::clone(&self.request),
            computed: Some(accumulator),
        })
    }

    /// Append `module_id` to the activated-modules trail of an owned context
    pub fn with_activation(mut self, module_id: &str) -> Self {
        self.computed
            .get_or_insert_with(Accumulator::default)
            .record_activation(module_id);
        self
    }

    /// Change counter of the accumulator (0 when none exists yet)
    pub fn revision(&self) -> u64 {
        self.computed.as_ref().map_or(0, Accumulator::revision)
    }

    pub fn signals(&self) -> Signals {
        self.computed
            .as_ref()
            .map(Accumulator::signals)
            .unwrap_or_default()
    }

    pub fn cost_total(&self) -> f64 {
        self.computed.as_ref().map_or(0.0, Accumulator::cost_total)
    }

    pub fn cost_total_for(&self, category: CostCategory) -> f64 {
        self.computed
            .as_ref()
            .map_or(0.0, |acc| acc.cost_total_for(category))
    }

    pub fn has_requirement(&self, requirement_type: &RequirementType) -> bool {
        self.computed
            .as_ref()
            .is_some_and(|acc| acc.has_requirement(requirement_type))
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.computed.as_ref().is_some_and(|acc| acc.has_flag(flag))
    }

    pub fn activated_modules(&self) -> &[String] {
        self.computed
            .as_ref()
            .map(Accumulator::activated_modules)
            .unwrap_or_default()
    }
}
