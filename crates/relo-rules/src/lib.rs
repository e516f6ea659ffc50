//! RELO Rules - Standard pricing rule catalog
//!
//! The catalog covers access constraints, distance, handling, temporal
//! surcharges, legal consequences and cross-sell proposals for moving and
//! cleaning quotes. Every module is configured from a [`RuleCatalogConfig`]
//! and is pure: it holds nothing but that configuration.

pub mod catalog;
pub mod config;
pub mod modules;

pub use catalog::{ids, standard_modules, standard_registry, ALWAYS_ON};
pub use config::RuleCatalogConfig;
