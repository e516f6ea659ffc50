//! Legal consequences of refusing a recommended furniture lift

use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{
    LegalImpact, LegalImpactType, QuoteContext, RequirementType, Result, RiskContribution,
    RuleModule, Severity, Trigger,
};
use std::sync::Arc;

/// Customer refused the furniture lift that was recommended
#[derive(Debug, Clone)]
pub struct LiftRefusal {
    config: Arc<RuleCatalogConfig>,
}

impl LiftRefusal {
    pub const FLAG: &'static str = "lift_refused";

    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for LiftRefusal {
    fn id(&self) -> &str {
        ids::LIFT_REFUSAL
    }

    fn priority(&self) -> i32 {
        500
    }

    fn dependencies(&self) -> Vec<&str> {
        vec![ids::ELEVATOR_FLOOR_CONSTRAINT]
    }

    fn trigger(&self) -> Trigger {
        Trigger::Computed
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        ctx.request().flags.lift_refused && ctx.has_requirement(&RequirementType::LiftRecommended)
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            acc.add_legal_impact(LegalImpact::new(
                self.id(),
                Severity::High,
                LegalImpactType::LiabilityLimitation,
                "The mover's liability for damage during carrying is limited because the recommended lift was refused",
            ));
            acc.add_legal_impact(LegalImpact::new(
                self.id(),
                Severity::High,
                LegalImpactType::InsuranceCap,
                "Insurance compensation is capped for items carried without the recommended lift",
            ));
            acc.add_insurance_note(
                "Customer refused the recommended furniture lift; coverage is reduced for carried items",
            );
            acc.set_flag(Self::FLAG);
            acc.add_risk(RiskContribution::new(
                self.id(),
                self.config.lift_refusal_risk_points,
                "Recommended furniture lift refused",
            ))
        })
    }
}
