//! Rule module contract
//!
//! A rule module is a small, independently testable unit of pricing logic.
//! It declares an id, a priority and optional dependencies, may restrict
//! itself with an applicability predicate, and transforms a context into a
//! new one.

use crate::context::QuoteContext;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a module gets activated. Informational only; never drives execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Runs on every request
    Always,
    /// Conditional on raw request fields
    Input,
    /// Conditional on state computed by earlier modules
    Computed,
}

/// Contract every pricing rule implements
///
/// Implementations must be pure: the same context always yields the same
/// result and no module keeps mutable state between calls. A module with no
/// predicate must return an equivalent context when it has nothing to do,
/// and must only fail on contradictory input.
pub trait RuleModule: Send + Sync {
    /// Unique, stable id
    fn id(&self) -> &str;

    /// Lower runs earlier among unconstrained modules
    fn priority(&self) -> i32;

    /// Ids of modules that must have executed before this one
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    fn trigger(&self) -> Trigger {
        Trigger::Always
    }

    /// Applicability predicate. The default accepts every context.
    fn is_applicable(&self, _ctx: &QuoteContext) -> bool {
        true
    }

    /// Produce the next context
    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext>;
}

impl fmt::Debug for dyn RuleModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleModule")
            .field("id", &self.id())
            .field("priority", &self.priority())
            .field("dependencies", &self.dependencies())
            .field("trigger", &self.trigger())
            .finish()
    }
}

type Predicate = Arc<dyn Fn(&QuoteContext) -> bool + Send + Sync>;
type Transform = Arc<dyn Fn(&QuoteContext) -> Result<QuoteContext> + Send + Sync>;

/// Closure-backed rule module
///
/// # Example
///
/// ```rust
/// use relo_core::{CostCategory, CostEntry, FnRule, QuoteContext};
///
/// let crew = FnRule::new("crew", 10, |ctx: &QuoteContext| {
///     ctx.with_accumulator(|acc| {
///         acc.add_cost(CostEntry::new("crew", CostCategory::Labor, "Crew", 400.0))
///     })
/// })
/// .when(|ctx| ctx.request().service_type.includes_moving());
/// ```
#[derive(Clone)]
pub struct FnRule {
    id: String,
    priority: i32,
    dependencies: Vec<String>,
    trigger: Trigger,
    predicate: Option<Predicate>,
    transform: Transform,
}

impl FnRule {
    pub fn new<F>(id: impl Into<String>, priority: i32, transform: F) -> Self
    where
        F: Fn(&QuoteContext) -> Result<QuoteContext> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            priority,
            dependencies: Vec::new(),
            trigger: Trigger::Always,
            predicate: None,
            transform: Arc::new(transform),
        }
    }

    /// A module that always returns its input unchanged
    pub fn noop(id: impl Into<String>, priority: i32) -> Self {
        Self::new(id, priority, |ctx: &QuoteContext| Ok(ctx.clone()))
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Attach an applicability predicate; an `Always` trigger becomes `Input`
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&QuoteContext) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        if self.trigger == Trigger::Always {
            self.trigger = Trigger::Input;
        }
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }
}

impl RuleModule for FnRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn dependencies(&self) -> Vec<&str> {
        self.dependencies.iter().map(String::as_str).collect()
    }

    fn trigger(&self) -> Trigger {
        self.trigger
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(ctx))
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        (self.transform)(ctx)
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("dependencies", &self.dependencies)
            .field("trigger", &self.trigger)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}
