//! Optional paid services proposed alongside the quote

use super::{effective_volume, is_moving, round_cents};
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{CrossSellProposal, QuoteContext, RequirementType, Result, RuleModule, Trigger};
use std::sync::Arc;

/// Offers a furniture lift when one is recommended and not refused
#[derive(Debug, Clone)]
pub struct LiftCrossSell {
    config: Arc<RuleCatalogConfig>,
}

impl LiftCrossSell {
    pub const PROPOSAL_ID: &'static str = "furniture_lift";

    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for LiftCrossSell {
    fn id(&self) -> &str {
        ids::LIFT_CROSS_SELL
    }

    fn priority(&self) -> i32 {
        600
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![ids::ELEVATOR_FLOOR_CONSTRAINT]
    }

    fn trigger(&self) -> Trigger {
        Trigger::Computed
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        !ctx.request().flags.lift_refused && ctx.has_requirement(&RequirementType::LiftRecommended)
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            acc.add_cross_sell(
                CrossSellProposal::new(
                    Self::PROPOSAL_ID,
                    "Furniture lift rental",
                    self.id(),
                    self.config.furniture_lift_price,
                )
                .with_reason("High floor without elevator")
                .with_benefit("Faster loading and full insurance coverage for bulky items")
                .based_on(RequirementType::LiftRecommended),
            );
            Ok(())
        })
    }
}

/// Offers packing for large volumes
#[derive(Debug, Clone)]
pub struct PackingCrossSell {
    config: Arc<RuleCatalogConfig>,
}

impl PackingCrossSell {
    pub const PROPOSAL_ID: &'static str = "packing_service";

    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for PackingCrossSell {
    fn id(&self) -> &str {
        ids::PACKING_CROSS_SELL
    }

    fn priority(&self) -> i32 {
        610
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![ids::VOLUME_NORMALIZATION]
    }

    fn trigger(&self) -> Trigger {
        Trigger::Computed
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx)
            && ctx
                .signals()
                .adjusted_volume
                .is_some_and(|v| v >= self.config.packing_volume_threshold_m3)
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        let volume = effective_volume(ctx);
        let price = round_cents(volume * self.config.packing_price_per_m3);
        ctx.with_accumulator(|acc| {
            acc.add_cross_sell(
                CrossSellProposal::new(Self::PROPOSAL_ID, "Packing service", self.id(), price)
                    .with_reason(format!("{} m3 to pack", volume))
                    .with_benefit("Boxes and packing handled by the crew"),
            );
            Ok(())
        })
    }
}
