//! Heavy items, storage and declared value

use super::{effective_volume, is_moving, round_cents};
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{
    CostCategory, CostEntry, LegalImpact, LegalImpactType, QuoteContext, Requirement,
    RequirementType, Result, RiskContribution, RuleError, RuleModule, Severity, Trigger,
};
use std::sync::Arc;

/// Specialist handling for pianos and safes
#[derive(Debug, Clone)]
pub struct HeavyItems {
    config: Arc<RuleCatalogConfig>,
}

impl HeavyItems {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }

    fn items(&self, ctx: &QuoteContext) -> Vec<(&'static str, f64)> {
        let flags = &ctx.request().flags;
        let mut items = Vec::new();
        if flags.piano {
            items.push(("piano", self.config.piano_fee));
        }
        if flags.safe {
            items.push(("safe", self.config.safe_fee));
        }
        items
    }
}

impl RuleModule for HeavyItems {
    fn id(&self) -> &str {
        ids::HEAVY_ITEMS
    }

    fn priority(&self) -> i32 {
        140
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && !self.items(ctx).is_empty()
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let items = self.items(ctx);
        if !is_moving(ctx) || items.is_empty() {
            return Ok(ctx.clone());
        }

        let names: Vec<&str> = items.iter().map(|(name, _)| *name).collect();
        ctx.with_accumulator(|acc| {
            for (name, fee) in &items {
                acc.add_cost(
                    CostEntry::new(
                        self.id(),
                        CostCategory::Handling,
                        format!("Specialist handling ({})", name),
                        *fee,
                    )
                    .with_metadata("item", *name),
                )?;
                acc.add_risk(RiskContribution::new(
                    self.id(),
                    self.config.heavy_item_risk_points,
                    format!("Heavy item: {}", name),
                ))?;
            }
            acc.add_requirement(
                Requirement::new(
                    RequirementType::SpecialistHandling,
                    Severity::High,
                    format!("Specialist crew and equipment for {}", names.join(" and ")),
                    self.id(),
                )
                .with_metadata("items", names),
            );
            Ok(())
        })
    }
}

/// Storage between pickup and delivery
#[derive(Debug, Clone)]
pub struct TemporaryStorage {
    config: Arc<RuleCatalogConfig>,
}

impl TemporaryStorage {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for TemporaryStorage {
    fn id(&self) -> &str {
        ids::TEMPORARY_STORAGE
    }

    fn priority(&self) -> i32 {
        160
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![ids::VOLUME_NORMALIZATION]
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && ctx.request().flags.temporary_storage
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        // Storage without a duration cannot be priced
        let days = match ctx.request().flags.storage_duration_days {
            Some(days) if days > 0 => days,
            _ => {
                return Err(RuleError::InvalidState(
                    "temporary storage requested without a storage duration".to_string(),
                ))
            }
        };

        let volume = effective_volume(ctx);
        let amount =
            round_cents(volume * f64::from(days) * self.config.storage_daily_rate_per_m3);

        ctx.with_accumulator(|acc| {
            acc.add_cost(
                CostEntry::new(
                    self.id(),
                    CostCategory::Storage,
                    format!("Temporary storage ({} m3 for {} days)", volume, days),
                    amount,
                )
                .with_metadata("days", days)
                .with_metadata("volume_m3", volume),
            )
        })
    }
}

/// Insurance advice for high declared values
#[derive(Debug, Clone)]
pub struct DeclaredValue {
    config: Arc<RuleCatalogConfig>,
}

impl DeclaredValue {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for DeclaredValue {
    fn id(&self) -> &str {
        ids::DECLARED_VALUE
    }

    fn priority(&self) -> i32 {
        200
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && ctx.request().declared_value > self.config.insurance_threshold
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        let value = ctx.request().declared_value;
        let threshold = self.config.insurance_threshold;
        ctx.with_accumulator(|acc| {
            acc.add_insurance_note(format!(
                "Declared value {:.2} exceeds the standard coverage of {:.2}; ad valorem insurance is advised",
                value, threshold
            ));
            acc.add_legal_impact(
                LegalImpact::new(
                    self.id(),
                    Severity::Medium,
                    LegalImpactType::ValueDeclaration,
                    "An itemised value declaration must be signed before the move",
                )
                .with_metadata("declared_value", value),
            );
            acc.add_risk(RiskContribution::new(
                self.id(),
                self.config.declared_value_risk_points,
                "High declared value",
            ))
        })
    }
}
