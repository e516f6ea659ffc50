//! RELO Core - Core types for the RELO quote engine
//!
//! This crate provides the fundamental types shared by every other crate:
//! - The quote request (caller supplied input)
//! - The accumulator of module outputs (costs, requirements, risk, ...)
//! - The per-request quote context threaded through the pipeline
//! - The rule module contract
//! - Error types

pub mod accumulator;
pub mod context;
pub mod error;
pub mod module;
pub mod request;

// Re-export commonly used types
pub use accumulator::{
    Accumulator, CostCategory, CostEntry, CrossSellProposal, LegalImpact, LegalImpactType,
    Metadata, ModuleEntries, Requirement, RequirementType, RiskContribution, Severity, Signals,
};
pub use context::QuoteContext;
pub use error::{Result, RuleError};
pub use module::{FnRule, RuleModule, Trigger};
pub use request::{Address, QuoteRequest, RequestFlags, ServiceType, Side};
