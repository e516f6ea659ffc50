//! Access constraints at pickup and delivery

use super::{is_moving, round_cents, side_names, sides_where};
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{
    CostCategory, CostEntry, QuoteContext, QuoteRequest, Requirement, RequirementType, Result,
    RiskContribution, RuleModule, Severity, Side, Trigger,
};
use std::sync::Arc;

/// Recommends a furniture lift for high floors without elevator
#[derive(Debug, Clone)]
pub struct ElevatorFloorConstraint {
    config: Arc<RuleCatalogConfig>,
}

impl ElevatorFloorConstraint {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }

    fn constrained_sides(&self, request: &QuoteRequest) -> Vec<Side> {
        sides_where(|side| {
            request.floor(side) >= self.config.lift_floor_threshold && !request.has_elevator(side)
        })
    }
}

impl RuleModule for ElevatorFloorConstraint {
    fn id(&self) -> &str {
        ids::ELEVATOR_FLOOR_CONSTRAINT
    }

    fn priority(&self) -> i32 {
        100
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && !self.constrained_sides(ctx.request()).is_empty()
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let sides = self.constrained_sides(ctx.request());
        if !is_moving(ctx) || sides.is_empty() {
            return Ok(ctx.clone());
        }

        let floors: Vec<i32> = sides.iter().map(|&s| ctx.request().floor(s)).collect();
        let reason = format!(
            "No elevator at {} (floor {}); a furniture lift is recommended",
            side_names(&sides),
            floors
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(" and ")
        );
        let side_list: Vec<&str> = sides.iter().map(Side::as_str).collect();

        ctx.with_accumulator(|acc| {
            acc.add_requirement(
                Requirement::new(
                    RequirementType::LiftRecommended,
                    Severity::High,
                    reason,
                    self.id(),
                )
                .with_metadata("sides", side_list),
            );
            acc.add_risk(RiskContribution::new(
                self.id(),
                self.config.lift_risk_points,
                "High floor without elevator",
            ))
        })
    }
}

/// Carrying cost for low floors without elevator
#[derive(Debug, Clone)]
pub struct StairsCarrying {
    config: Arc<RuleCatalogConfig>,
}

impl StairsCarrying {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }

    fn carried_sides(&self, request: &QuoteRequest) -> Vec<Side> {
        sides_where(|side| {
            let floor = request.floor(side);
            floor > 0 && floor < self.config.lift_floor_threshold && !request.has_elevator(side)
        })
    }
}

impl RuleModule for StairsCarrying {
    fn id(&self) -> &str {
        ids::STAIRS_CARRYING
    }

    fn priority(&self) -> i32 {
        110
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && !self.carried_sides(ctx.request()).is_empty()
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !is_moving(ctx) {
            return Ok(ctx.clone());
        }
        let sides = self.carried_sides(ctx.request());
        if sides.is_empty() {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            for side in sides {
                let floor = ctx.request().floor(side);
                let amount = round_cents(f64::from(floor) * self.config.stairs_cost_per_floor);
                acc.add_cost(
                    CostEntry::new(
                        self.id(),
                        CostCategory::Access,
                        format!("Stairs carrying at {} (floor {})", side, floor),
                        amount,
                    )
                    .with_metadata("side", side.as_str())
                    .with_metadata("floor", floor),
                )?;
            }
            Ok(())
        })
    }
}

/// Parking permit and fee for narrow streets
#[derive(Debug, Clone)]
pub struct NarrowStreet {
    config: Arc<RuleCatalogConfig>,
}

impl NarrowStreet {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for NarrowStreet {
    fn id(&self) -> &str {
        ids::NARROW_STREET
    }

    fn priority(&self) -> i32 {
        120
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && Side::BOTH.iter().any(|&s| ctx.request().narrow_street(s))
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let sides = sides_where(|side| ctx.request().narrow_street(side));
        if !is_moving(ctx) || sides.is_empty() {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            acc.add_requirement(Requirement::new(
                RequirementType::ParkingPermit,
                Severity::Medium,
                format!("Narrow street at {}; a parking permit is needed", side_names(&sides)),
                self.id(),
            ));
            for &side in &sides {
                acc.add_cost(
                    CostEntry::new(
                        self.id(),
                        CostCategory::Access,
                        format!("Parking permit at {}", side),
                        self.config.narrow_street_fee,
                    )
                    .with_metadata("side", side.as_str()),
                )?;
            }
            acc.add_risk(RiskContribution::new(
                self.id(),
                self.config.narrow_street_risk_points,
                "Truck access restricted",
            ))
        })
    }
}

/// Building manager booking for restricted time slots
#[derive(Debug, Clone, Default)]
pub struct SyndicTimeSlot;

impl SyndicTimeSlot {
    pub const FLAG: &'static str = "building_manager_booking_required";

    pub fn new() -> Self {
        Self
    }
}

impl RuleModule for SyndicTimeSlot {
    fn id(&self) -> &str {
        ids::SYNDIC_TIME_SLOT
    }

    fn priority(&self) -> i32 {
        130
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        Side::BOTH.iter().any(|&s| ctx.request().syndic_time_slot(s))
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let sides = sides_where(|side| ctx.request().syndic_time_slot(side));
        if sides.is_empty() {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            acc.add_requirement(Requirement::new(
                RequirementType::BuildingManagerBooking,
                Severity::Medium,
                format!(
                    "Building manager imposes a time slot at {}",
                    side_names(&sides)
                ),
                self.id(),
            ));
            acc.set_flag(Self::FLAG);
            Ok(())
        })
    }
}
