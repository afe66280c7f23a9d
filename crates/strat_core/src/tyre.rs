//! Tyre wear model.
//!
//! Wear for the Medium compound is derived from circuit length, the circuit's
//! base wear and the car's tyre points, scaled per compound, then decayed
//! exponentially over the stint.

use serde::Serialize;

use crate::tables::{
    compound_wear_multiplier, wear_multiplier_by_name, PERFORMANCE_TIERS, PIT_WINDOW_TIERS,
};
use crate::{clamp_points, require_laps, Circuit, CircuitCode, Compound, PlannerContent, Result};

/// Calibration distance `D0` in the base wear formula.
const WEAR_CALIBRATION_DISTANCE: f64 = 50.0;
const WEAR_DECAY_RATE: f64 = 1.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceImpact {
    Excellent,
    Good,
    Acceptable,
    Degraded,
    Critical,
}

impl PerformanceImpact {
    pub(crate) fn from_remaining(remaining: f64) -> Self {
        PERFORMANCE_TIERS
            .iter()
            .find(|(threshold, _)| remaining >= *threshold)
            .map_or(PerformanceImpact::Critical, |(_, tier)| *tier)
    }

    /// Pace change in percent; zero or negative.
    pub fn pace_delta_pct(self) -> f64 {
        match self {
            PerformanceImpact::Excellent => 0.0,
            PerformanceImpact::Good => -0.5,
            PerformanceImpact::Acceptable => -1.2,
            PerformanceImpact::Degraded => -2.5,
            PerformanceImpact::Critical => -4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PitWindow {
    Continue,
    ConsiderStopping,
    StopSoon,
    StopNow,
}

impl PitWindow {
    pub(crate) fn from_remaining(remaining: f64) -> Self {
        PIT_WINDOW_TIERS
            .iter()
            .find(|(threshold, _)| remaining > *threshold)
            .map_or(PitWindow::StopNow, |(_, window)| *window)
    }

    pub fn urgency(self) -> Urgency {
        match self {
            PitWindow::Continue => Urgency::Low,
            PitWindow::ConsiderStopping => Urgency::Medium,
            PitWindow::StopSoon => Urgency::High,
            PitWindow::StopNow => Urgency::Critical,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            PitWindow::Continue => "continue",
            PitWindow::ConsiderStopping => "consider stopping soon",
            PitWindow::StopSoon => "stop in next laps",
            PitWindow::StopNow => "stop immediately",
        }
    }
}

/// Full-precision wear figures for one stint. Round with
/// [`TyreWearResult::rounded`] only when displaying.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TyreWearResult {
    pub circuit: CircuitCode,
    pub laps: u32,
    pub tyre_points: f64,
    pub compound_multiplier: f64,
    /// Per-lap wear percentage for the Medium compound.
    pub base_wear: f64,
    /// Per-lap wear percentage after the compound multiplier.
    pub compound_wear: f64,
    pub remaining: f64,
    pub total_wear: f64,
    pub performance: PerformanceImpact,
    pub pit_window: PitWindow,
}

/// Per-lap Medium wear `W_M` in percent for already-clamped tyre points.
pub fn medium_wear_rate(circuit: &Circuit, tyre_points: f64) -> f64 {
    let points_factor = (tyre_points / 1.5).powf(-0.0778);
    let wear_factor = 0.00364 * circuit.tyre_wear_pct + 0.354;
    1.43 * points_factor
        * wear_factor
        * circuit.length_km
        * 1.384_612
        * (200.0 - WEAR_CALIBRATION_DISTANCE)
        / 10_000.0
        * 100.0
}

/// Tyre life left after `laps` at `compound_wear` percent per lap.
pub fn remaining_after(compound_wear: f64, laps: u32) -> f64 {
    100.0 * (-WEAR_DECAY_RATE * (compound_wear / 100.0) * f64::from(laps)).exp()
}

/// Inputs must already be validated; the evaluator and generator call this directly.
pub(crate) fn stint_wear(
    circuit: &Circuit,
    compound_multiplier: f64,
    laps: u32,
    tyre_points: f64,
) -> TyreWearResult {
    let laps = laps.max(1);
    let tyre_points = tyre_points.max(1.0);
    let base_wear = medium_wear_rate(circuit, tyre_points);
    let compound_wear = base_wear * compound_multiplier;
    let remaining = remaining_after(compound_wear, laps);
    TyreWearResult {
        circuit: circuit.code.clone(),
        laps,
        tyre_points,
        compound_multiplier,
        base_wear,
        compound_wear,
        remaining,
        total_wear: 100.0 - remaining,
        performance: PerformanceImpact::from_remaining(remaining),
        pit_window: PitWindow::from_remaining(remaining),
    }
}

pub fn compute_tyre_wear(
    content: &PlannerContent,
    circuit_code: &str,
    compound: Compound,
    laps: u32,
    tyre_points: f64,
) -> Result<TyreWearResult> {
    let circuit = content.circuit(circuit_code)?;
    let laps = require_laps("lap_count", laps)?;
    let tyre_points = clamp_points("tyre_points", tyre_points)?;
    Ok(stint_wear(
        circuit,
        compound_wear_multiplier(compound),
        laps,
        tyre_points,
    ))
}

/// Same as [`compute_tyre_wear`] for a free-form compound name; names outside the
/// four grades wear like Medium.
pub fn compute_tyre_wear_by_name(
    content: &PlannerContent,
    circuit_code: &str,
    compound_name: &str,
    laps: u32,
    tyre_points: f64,
) -> Result<TyreWearResult> {
    let circuit = content.circuit(circuit_code)?;
    let laps = require_laps("lap_count", laps)?;
    let tyre_points = clamp_points("tyre_points", tyre_points)?;
    Ok(stint_wear(
        circuit,
        wear_multiplier_by_name(compound_name),
        laps,
        tyre_points,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::base_content;
    use crate::PlannerError;

    #[test]
    fn france_medium_scenario() {
        let content = base_content();
        let result = compute_tyre_wear(&content, "france", Compound::Medium, 6, 49.0).unwrap();
        // W_M worked by hand from the formula: ~8.59% per lap.
        assert!(
            (result.base_wear - 8.59).abs() < 0.01,
            "base wear {}",
            result.base_wear
        );
        assert!((result.compound_wear - result.base_wear).abs() < 1e-12);
        assert!(result.remaining > 0.0 && result.remaining < 100.0);
        assert!((result.remaining - 54.4).abs() < 0.1, "{}", result.remaining);
        assert!((result.remaining + result.total_wear - 100.0).abs() < 1e-9);
        assert_eq!(result.performance, PerformanceImpact::Acceptable);
        assert_eq!(result.pit_window, PitWindow::ConsiderStopping);
    }

    #[test]
    fn hard_lasts_longer_than_supersoft() {
        let content = base_content();
        let hard = compute_tyre_wear(&content, "france", Compound::Hard, 10, 80.0).unwrap();
        let soft = compute_tyre_wear(&content, "france", Compound::SuperSoft, 10, 80.0).unwrap();
        assert!(hard.total_wear < soft.total_wear);
    }

    #[test]
    fn unknown_circuit() {
        let content = base_content();
        let err = compute_tyre_wear(&content, "nowhere", Compound::Soft, 5, 50.0).unwrap_err();
        assert_eq!(err, PlannerError::UnknownCircuit("nowhere".to_string()));
    }

    #[test]
    fn rejects_zero_laps_and_points() {
        let content = base_content();
        assert!(compute_tyre_wear(&content, "france", Compound::Soft, 0, 50.0).is_err());
        assert!(compute_tyre_wear(&content, "france", Compound::Soft, 5, 0.0).is_err());
        assert!(compute_tyre_wear(&content, "france", Compound::Soft, 5, -10.0).is_err());
    }

    #[test]
    fn fractional_points_clamp_to_one() {
        let content = base_content();
        let low = compute_tyre_wear(&content, "france", Compound::Soft, 5, 0.3).unwrap();
        let one = compute_tyre_wear(&content, "france", Compound::Soft, 5, 1.0).unwrap();
        assert_eq!(low, one);
    }

    #[test]
    fn unknown_compound_name_wears_like_medium() {
        let content = base_content();
        let named = compute_tyre_wear_by_name(&content, "monaco", "intermediate", 9, 60.0).unwrap();
        let medium = compute_tyre_wear(&content, "monaco", Compound::Medium, 9, 60.0).unwrap();
        assert!((named.remaining - medium.remaining).abs() < 1e-12);
        let hard = compute_tyre_wear_by_name(&content, "monaco", "hArD", 9, 60.0).unwrap();
        assert!((hard.compound_multiplier - 0.375).abs() < 1e-12);
    }

    #[test]
    fn performance_tier_boundaries() {
        let cases = [
            (100.0, PerformanceImpact::Excellent),
            (80.0, PerformanceImpact::Excellent),
            (79.99, PerformanceImpact::Good),
            (60.0, PerformanceImpact::Good),
            (40.0, PerformanceImpact::Acceptable),
            (20.0, PerformanceImpact::Degraded),
            (19.99, PerformanceImpact::Critical),
            (0.0, PerformanceImpact::Critical),
        ];
        for (remaining, expected) in cases {
            assert_eq!(
                PerformanceImpact::from_remaining(remaining),
                expected,
                "remaining={remaining}"
            );
        }
        assert!((PerformanceImpact::Degraded.pace_delta_pct() + 2.5).abs() < 1e-12);
    }

    #[test]
    fn pit_window_boundaries_are_strict() {
        let cases = [
            (70.01, PitWindow::Continue, Urgency::Low),
            (70.0, PitWindow::ConsiderStopping, Urgency::Medium),
            (40.0, PitWindow::StopSoon, Urgency::High),
            (20.0, PitWindow::StopNow, Urgency::Critical),
        ];
        for (remaining, window, urgency) in cases {
            let got = PitWindow::from_remaining(remaining);
            assert_eq!(got, window, "remaining={remaining}");
            assert_eq!(got.urgency(), urgency);
        }
        assert_eq!(PitWindow::StopSoon.advice(), "stop in next laps");
    }
}
