//! RELO Quote Engine SDK
//!
//! High-level API for assembling the standard rule catalog into a quote
//! engine and computing quotes with it.
//!
//! ```rust,no_run
//! use relo_sdk::{QuoteEngineBuilder, QuoteRequest, ServiceType};
//!
//! # fn main() -> relo_sdk::Result<()> {
//! let engine = QuoteEngineBuilder::new().enable_tracing(true).build()?;
//! let outcome = engine.compute(QuoteRequest::new(ServiceType::Moving).with_volume(30.0))?;
//! println!("total: {}", outcome.cost_total());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod logging;
pub mod quote_engine;

// Re-export main types
pub use builder::QuoteEngineBuilder;
pub use config::EngineConfig;
pub use error::{Result, SdkError};
pub use logging::init_tracing;
pub use quote_engine::{QuoteEngine, QuoteOutcome};

// Re-export commonly used types from dependencies
pub use relo_core::{
    Accumulator, Address, CostCategory, QuoteContext, QuoteRequest, RequestFlags, RuleModule,
    ServiceType,
};
pub use relo_rules::RuleCatalogConfig;
pub use relo_runtime::{FailureReport, MetricsCollector, MetricsSnapshot, PipelineTrace};
