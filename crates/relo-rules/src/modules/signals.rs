//! Always-on modules that derive forward signals for later modules.
//!
//! They never add costs, requirements or risk.

use super::sides_where;
use crate::catalog::ids;
use crate::RuleCatalogConfig;
use relo_core::{QuoteContext, Result, RuleModule, Side};
use std::sync::Arc;

/// Derives the adjusted volume and crew size
#[derive(Debug, Clone)]
pub struct VolumeNormalization {
    config: Arc<RuleCatalogConfig>,
}

impl VolumeNormalization {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for VolumeNormalization {
    fn id(&self) -> &str {
        ids::VOLUME_NORMALIZATION
    }

    fn priority(&self) -> i32 {
        10
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let request = ctx.request();
        let factor = if request.flags.bulky_furniture {
            self.config.bulky_volume_factor
        } else {
            1.0
        };
        let adjusted = (request.volume_m3 * factor * 100.0).round() / 100.0;
        let workers = ((adjusted / self.config.volume_per_worker_m3).ceil() as u32)
            .max(self.config.min_workers);

        ctx.with_accumulator(|acc| {
            acc.update_signals(|signals| {
                signals.adjusted_volume = Some(adjusted);
                signals.workers_count = Some(workers);
            });
            Ok(())
        })
    }
}

/// Classifies the move as local or long distance
#[derive(Debug, Clone)]
pub struct DistanceClassification {
    config: Arc<RuleCatalogConfig>,
}

impl DistanceClassification {
    pub fn new(config: Arc<RuleCatalogConfig>) -> Self {
        Self { config }
    }
}

impl RuleModule for DistanceClassification {
    fn id(&self) -> &str {
        ids::DISTANCE_CLASSIFICATION
    }

    fn priority(&self) -> i32 {
        20
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let long = ctx.request().distance_km > self.config.long_distance_threshold_km;
        ctx.with_accumulator(|acc| {
            acc.update_signals(|signals| signals.is_long_distance = Some(long));
            Ok(())
        })
    }
}

/// Counts access constraints on both ends of the move
#[derive(Debug, Clone, Default)]
pub struct AccessDifficulty;

impl AccessDifficulty {
    pub fn new() -> Self {
        Self
    }
}

impl RuleModule for AccessDifficulty {
    fn id(&self) -> &str {
        ids::ACCESS_DIFFICULTY
    }

    fn priority(&self) -> i32 {
        30
    }

    fn apply(&self, ctx: &QuoteContext) -> Result<QuoteContext> {
        let request = ctx.request();
        let stairs = sides_where(|side: Side| request.floor(side) > 0 && !request.has_elevator(side));
        let streets = sides_where(|side| request.narrow_street(side));
        let slots = sides_where(|side| request.syndic_time_slot(side));
        let score = (stairs.len() + streets.len() + slots.len()) as u32;

        ctx.with_accumulator(|acc| {
            acc.update_signals(|signals| signals.access_difficulty = Some(score));
            Ok(())
        })
    }
}
