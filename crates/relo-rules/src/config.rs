//! Tunables of the standard rule catalog
//!
//! Every field has a default, so a partial YAML section only overrides what
//! it names.

use relo_core::{Result, RuleError};
use serde::{Deserialize, Serialize};

/// Rule catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCatalogConfig {
    // ========== Volume and crew ==========
    /// Multiplier applied to the declared volume when bulky furniture is present
    pub bulky_volume_factor: f64,

    /// Cubic meters one mover handles; drives the crew size signal
    pub volume_per_worker_m3: f64,

    pub min_workers: u32,

    // ========== Access ==========
    /// Lowest floor without elevator at which a furniture lift is recommended
    pub lift_floor_threshold: i32,

    pub lift_risk_points: f64,

    /// Carrying cost per floor climbed without elevator, below the lift threshold
    pub stairs_cost_per_floor: f64,

    /// Parking permit fee per narrow-street side
    pub narrow_street_fee: f64,

    pub narrow_street_risk_points: f64,

    // ========== Distance ==========
    pub long_distance_threshold_km: f64,

    /// Rate per kilometer beyond the long-distance threshold
    pub long_distance_rate_per_km: f64,

    // ========== Handling and storage ==========
    pub piano_fee: f64,

    pub safe_fee: f64,

    /// Risk points per heavy item
    pub heavy_item_risk_points: f64,

    /// Storage price per cubic meter and day
    pub storage_daily_rate_per_m3: f64,

    // ========== Insurance ==========
    /// Declared value above which ad valorem insurance is advised
    pub insurance_threshold: f64,

    pub declared_value_risk_points: f64,

    // ========== Temporal ==========
    pub weekend_surcharge_percent: f64,

    pub weekend_risk_points: f64,

    pub end_of_month_surcharge_percent: f64,

    /// Number of days at the end of a month that count as peak period
    pub end_of_month_days: u32,

    // ========== Legal and cross-sell ==========
    pub lift_refusal_risk_points: f64,

    pub furniture_lift_price: f64,

    /// Adjusted volume from which a packing service is proposed
    pub packing_volume_threshold_m3: f64,

    pub packing_price_per_m3: f64,
}

impl Default for RuleCatalogConfig {
    fn default() -> Self {
        Self {
            bulky_volume_factor: 1.15,
            volume_per_worker_m3: 15.0,
            min_workers: 2,
            lift_floor_threshold: 4,
            lift_risk_points: 15.0,
            stairs_cost_per_floor: 40.0,
            narrow_street_fee: 60.0,
            narrow_street_risk_points: 5.0,
            long_distance_threshold_km: 50.0,
            long_distance_rate_per_km: 1.2,
            piano_fee: 250.0,
            safe_fee: 300.0,
            heavy_item_risk_points: 10.0,
            storage_daily_rate_per_m3: 0.5,
            insurance_threshold: 10_000.0,
            declared_value_risk_points: 5.0,
            weekend_surcharge_percent: 5.0,
            weekend_risk_points: 5.0,
            end_of_month_surcharge_percent: 3.0,
            end_of_month_days: 3,
            lift_refusal_risk_points: 25.0,
            furniture_lift_price: 180.0,
            packing_volume_threshold_m3: 20.0,
            packing_price_per_m3: 8.0,
        }
    }
}

impl RuleCatalogConfig {
    /// Check that every tunable is usable by the modules
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("bulky_volume_factor", self.bulky_volume_factor),
            ("stairs_cost_per_floor", self.stairs_cost_per_floor),
            ("narrow_street_fee", self.narrow_street_fee),
            ("long_distance_threshold_km", self.long_distance_threshold_km),
            ("long_distance_rate_per_km", self.long_distance_rate_per_km),
            ("piano_fee", self.piano_fee),
            ("safe_fee", self.safe_fee),
            ("storage_daily_rate_per_m3", self.storage_daily_rate_per_m3),
            ("insurance_threshold", self.insurance_threshold),
            ("weekend_surcharge_percent", self.weekend_surcharge_percent),
            ("end_of_month_surcharge_percent", self.end_of_month_surcharge_percent),
            ("furniture_lift_price", self.furniture_lift_price),
            ("packing_volume_threshold_m3", self.packing_volume_threshold_m3),
            ("packing_price_per_m3", self.packing_price_per_m3),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(RuleError::invalid_value(
                    field,
                    format!("must be a finite, non-negative number (got {})", value),
                ));
            }
        }

        let risks = [
            ("lift_risk_points", self.lift_risk_points),
            ("narrow_street_risk_points", self.narrow_street_risk_points),
            ("heavy_item_risk_points", self.heavy_item_risk_points),
            ("declared_value_risk_points", self.declared_value_risk_points),
            ("weekend_risk_points", self.weekend_risk_points),
            ("lift_refusal_risk_points", self.lift_refusal_risk_points),
        ];
        for (field, value) in risks {
            if !(0.0..=100.0).contains(&value) {
                return Err(RuleError::invalid_value(
                    field,
                    format!("risk points must lie in 0..=100 (got {})", value),
                ));
            }
        }

        if !self.volume_per_worker_m3.is_finite() || self.volume_per_worker_m3 <= 0.0 {
            return Err(RuleError::invalid_value(
                "volume_per_worker_m3",
                "must be greater than zero",
            ));
        }
        if self.lift_floor_threshold < 1 {
            return Err(RuleError::invalid_value(
                "lift_floor_threshold",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}
