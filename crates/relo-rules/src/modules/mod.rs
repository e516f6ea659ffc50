//! Rule module implementations
//!
//! Each module is a small struct holding the shared catalog configuration.
//! `apply` re-checks its own preconditions, so calling it on a context the
//! predicate would reject returns an equivalent context.

mod access;
mod cross_sell;
mod distance;
mod handling;
mod legal;
mod signals;
mod temporal;

pub use access::{ElevatorFloorConstraint, NarrowStreet, StairsCarrying, SyndicTimeSlot};
pub use cross_sell::{LiftCrossSell, PackingCrossSell};
pub use distance::LongDistance;
pub use handling::{DeclaredValue, HeavyItems, TemporaryStorage};
pub use legal::LiftRefusal;
pub use signals::{AccessDifficulty, DistanceClassification, VolumeNormalization};
pub use temporal::{EndOfMonthSurcharge, WeekendSurcharge};

use relo_core::{QuoteContext, Side};

/// Round a currency amount to cents
pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub(crate) fn is_moving(ctx: &QuoteContext) -> bool {
    ctx.request().service_type.includes_moving()
}

/// Sides matching `predicate`, pickup first
pub(crate) fn sides_where(predicate: impl Fn(Side) -> bool) -> Vec<Side> {
    Side::BOTH.into_iter().filter(|&side| predicate(side)).collect()
}

pub(crate) fn side_names(sides: &[Side]) -> String {
    sides
        .iter()
        .map(Side::as_str)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Adjusted volume signal, falling back to the declared volume
pub(crate) fn effective_volume(ctx: &QuoteContext) -> f64 {
    ctx.signals()
        .adjusted_volume
        .unwrap_or(ctx.request().volume_m3)
}
