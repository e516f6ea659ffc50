//! Long-distance pricing

use super::{is_moving, round_cents};
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{CostCategory, CostEntry, QuoteContext, Result, RuleModule, Trigger};
use std::sync::Arc;

/// Charges every kilometer beyond the long-distance threshold
#[derive(Debug, Clone)]
pub struct LongDistance {
    config: Arc<RuleCatalogConfig>,
}

impl LongDistance {
    pub const FLAG: &'static str = "long_distance";

    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for LongDistance {
    fn id(&self) -> &str {
        ids::LONG_DISTANCE
    }

    fn priority(&self) -> i32 {
        150
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![ids::DISTANCE_CLASSIFICATION]
    }

    fn trigger(&self) -> Trigger {
        Trigger::Computed
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && ctx.signals().is_long_distance == Some(true)
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        let distance = ctx.request().distance_km;
        let extra_km = (distance - self.config.long_distance_threshold_km).max(0.0);
        let amount = round_cents(extra_km * self.config.long_distance_rate_per_km);
        tracing::debug!(distance, extra_km, amount, "long distance surcharge");

        ctx.with_accumulator(|acc| {
            acc.add_cost(
                CostEntry::new(
                    self.id(),
                    CostCategory::Distance,
                    format!("Long distance ({:.0} km beyond {:.0} km)", extra_km, self.config.long_distance_threshold_km),
                    amount,
                )
                .with_metadata("distance_km", distance),
            )?;
            acc.set_flag(Self::FLAG);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{config, ctx, moving};
    use crate::modules::DistanceClassification;

    fn classified(distance: f64) -> QuoteContext {
        DistanceClassification::new(config())
            .apply(&ctx(moving().with_distance(distance)))
            .unwrap()
    }

    #[test]
    fn test_long_distance_cost() {
        let module = LongDistance::new(config());
        let start = classified(250.0);
        assert!(module.is_applicable(&start));

        let out = module.apply(&start).unwrap();
        assert_eq!(out.cost_total_for(CostCategory::Distance), 240.0);
        assert!(out.has_flag(LongDistance::FLAG));
    }

    #[test]
    fn test_local_move_is_untouched() {
        let module = LongDistance::new(config());
        let start = classified(30.0);
        assert!(!module.is_applicable(&start));
        assert_eq!(module.apply(&start).unwrap(), start);
    }

    #[test]
    fn test_requires_classification_signal() {
        // Without the signal the module has nothing to read
        let module = LongDistance::new(config());
        let start = ctx(moving().with_distance(900.0));
        assert!(!module.is_applicable(&start));
    }
}
