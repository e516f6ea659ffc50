//! Standard rule catalog
//!
//! Builds the registry of every standard module from one configuration.
//! Registration order follows the table below; execution order is decided
//! by the compiler from priorities and dependencies.

use crate::config::RuleCatalogConfig;
use crate::modules::{
    AccessDifficulty, DeclaredValue, DistanceClassification, ElevatorFloorConstraint,
    EndOfMonthSurcharge, HeavyItems, LiftCrossSell, LiftRefusal, LongDistance, NarrowStreet,
    PackingCrossSell, StairsCarrying, SyndicTimeSlot, TemporaryStorage, VolumeNormalization,
    WeekendSurcharge,
};
use relo_compiler::ModuleRegistry;
use relo_core::RuleModule;
use std::sync::Arc;

/// Module ids of the standard catalog
pub mod ids {
    pub const VOLUME_NORMALIZATION: &str = "volume_normalization";
    pub const DISTANCE_CLASSIFICATION: &str = "distance_classification";
    pub const ACCESS_DIFFICULTY: &str = "access_difficulty";
    pub const ELEVATOR_FLOOR_CONSTRAINT: &str = "elevator_floor_constraint";
    pub const STAIRS_CARRYING: &str = "stairs_carrying";
    pub const NARROW_STREET: &str = "narrow_street";
    pub const SYNDIC_TIME_SLOT: &str = "syndic_time_slot";
    pub const HEAVY_ITEMS: &str = "heavy_items";
    pub const LONG_DISTANCE: &str = "long_distance";
    pub const TEMPORARY_STORAGE: &str = "temporary_storage";
    pub const DECLARED_VALUE: &str = "declared_value";
    pub const WEEKEND_SURCHARGE: &str = "weekend_surcharge";
    pub const END_OF_MONTH_SURCHARGE: &str = "end_of_month_surcharge";
    pub const LIFT_REFUSAL: &str = "lift_refusal";
    pub const LIFT_CROSS_SELL: &str = "lift_cross_sell";
    pub const PACKING_CROSS_SELL: &str = "packing_cross_sell";
}

/// Modules without a predicate, in execution order. They only derive signals.
pub const ALWAYS_ON: [&str; 3] = [
    ids::VOLUME_NORMALIZATION,
    ids::DISTANCE_CLASSIFICATION,
    ids::ACCESS_DIFFICULTY,
];

/// Registry holding the standard catalog, configured from `config`
pub fn standard_registry(config: &RuleCatalogConfig) -> ModuleRegistry {
    let config = Arc::new(config.clone());

    ModuleRegistry::new()
        .with_module(VolumeNormalization::new(config.clone()))
        .with_module(DistanceClassification::new(config.clone()))
        .with_module(AccessDifficulty::new())
        .with_module(ElevatorFloorConstraint::new(config.clone()))
        .with_module(StairsCarrying::new(config.clone()))
        .with_module(NarrowStreet::new(config.clone()))
        .with_module(SyndicTimeSlot::new())
        .with_module(HeavyItems::new(config.clone()))
        .with_module(LongDistance::new(config.clone()))
        .with_module(TemporaryStorage::new(config.clone()))
        .with_module(DeclaredValue::new(config.clone()))
        .with_module(WeekendSurcharge::new(config.clone()))
        .with_module(EndOfMonthSurcharge::new(config.clone()))
        .with_module(LiftRefusal::new(config.clone()))
        .with_module(LiftCrossSell::new(config.clone()))
        .with_module(PackingCrossSell::new(config))
}

/// Every standard module, in registration order
pub fn standard_modules(config: &RuleCatalogConfig) -> Vec<Arc<dyn RuleModule>> {
    standard_registry(config).modules().to_vec()
}
