//! Date-driven surcharges

use super::{is_moving, round_cents};
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use chrono::{Datelike, NaiveDate, Weekday};
use relo_core::{CostCategory, CostEntry, QuoteContext, Result, RiskContribution, RuleModule, Trigger};
use std::sync::Arc;

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Percentage of the cost accumulated so far, for weekend moves
#[derive(Debug, Clone)]
pub struct WeekendSurcharge {
    config: Arc<RuleCatalogConfig>,
}

impl WeekendSurcharge {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for WeekendSurcharge {
    fn id(&self) -> &str {
        ids::WEEKEND_SURCHARGE
    }

    fn priority(&self) -> i32 {
        300
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && ctx.request().move_date.is_some_and(is_weekend)
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        let base = ctx.cost_total();
        let amount = round_cents(base * self.config.weekend_surcharge_percent / 100.0);

        ctx.with_accumulator(|acc| {
            // A zero surcharge is not a cost line
            if amount > 0.0 {
                acc.add_cost(
                    CostEntry::new(
                        self.id(),
                        CostCategory::Temporal,
                        format!("Weekend surcharge ({}%)", self.config.weekend_surcharge_percent),
                        amount,
                    )
                    .with_metadata("base", base),
                )?;
            }
            acc.add_risk(RiskContribution::new(
                self.id(),
                self.config.weekend_risk_points,
                "Weekend crew availability",
            ))
        })
    }
}

/// Percentage of the cost accumulated so far, for the last days of a month
#[derive(Debug, Clone)]
pub struct EndOfMonthSurcharge {
    config: Arc<RuleCatalogConfig>,
}

impl EndOfMonthSurcharge {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }

    fn in_peak(&self, date: NaiveDate) -> bool {
        days_in_month(date) - date.day() < self.config.end_of_month_days
    }
}

impl RuleModule for EndOfMonthSurcharge {
    fn id(&self) -> &str {
        ids::END_OF_MONTH_SURCHARGE
    }

    fn priority(&self) -> i32 {
        310
    }

    fn trigger(&self) -> Trigger {
        Trigger::Input
    }

    fn is_applicable(&self, ctx: &QuoteContext) -> bool {
        is_moving(ctx) && ctx.request().move_date.is_some_and(|d| self.in_peak(d))
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        if !self.is_applicable(ctx) {
            return Ok(ctx.clone());
        }

        let base = ctx.cost_total();
        let amount = round_cents(base * self.config.end_of_month_surcharge_percent / 100.0);
        if amount <= 0.0 {
            return Ok(ctx.clone());
        }

        ctx.with_accumulator(|acc| {
            acc.add_cost(
                CostEntry::new(
                    self.id(),
                    CostCategory::Temporal,
                    format!(
                        "End of month surcharge ({}%)",
                        self.config.end_of_month_surcharge_percent
                    ),
                    amount,
                )
                .with_metadata("base", base),
            )
        })
    }
}
