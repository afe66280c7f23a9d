//! `strat_core`: deterministic race strategy engine.
//!
//! No IO, no network. Every operation is a pure function of its inputs and the
//! read-only [`PlannerContent`] passed in by the caller.

mod comparator;
mod error;
mod evaluator;
mod fuel;
mod generator;
pub mod present;
mod tables;
mod tyre;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use comparator::{
    analyze_strategy, compare_strategies, pros_and_cons, Comparison, ComparisonEntry, ProsCons,
    StrategyAnalysis,
};
pub use error::{PlannerError, Result};
pub use evaluator::{evaluate, optimize_strategy, Optimization, ScoredStrategy};
pub use fuel::{
    compute_lap_fuel, compute_race_fuel, compute_stint_fuel, fuel_per_km, FuelEfficiency,
    LapTimeImpact, PaceDirection, RaceFuel, StintFuel,
};
pub use generator::{generate_strategies, StrategyCandidates, StrategyConstraints};
pub use tables::{compound_wear_multiplier, wear_multiplier_by_name, NORMALIZED_SETUP_POINTS};
pub use tyre::{
    compute_tyre_wear, compute_tyre_wear_by_name, medium_wear_rate, remaining_after,
    PerformanceImpact, PitWindow, TyreWearResult, Urgency,
};
pub use types::*;

/// Rejects non-positive (or NaN) setup points and clamps the rest to at least 1.
pub(crate) fn clamp_points(field: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value.max(1.0))
    } else {
        Err(PlannerError::InvalidInput {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

pub(crate) fn require_laps(field: &'static str, laps: u32) -> Result<u32> {
    if laps == 0 {
        Err(PlannerError::InvalidInput {
            field,
            reason: "must be at least 1 lap".to_string(),
        })
    } else {
        Ok(laps)
    }
}
