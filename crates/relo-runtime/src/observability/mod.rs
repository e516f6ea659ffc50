//! Observability module
//!
//! In-process metrics for quote runs. Recording is observational only; it
//! never influences what the pipeline computes.

pub mod metrics;

pub use metrics::{
    Counter, Histogram, HistogramSummary, Metrics, MetricsCollector, MetricsSnapshot,
};
