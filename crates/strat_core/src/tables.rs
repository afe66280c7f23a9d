//! Fixed lookup tables shared by the wear and fuel models.
//!
//! Tiers are ordered from best to worst; the first row whose threshold is met wins.

use crate::{Compound, FuelEfficiency, PerformanceImpact, PitWindow};

/// Tyre and fuel points the evaluator and comparator score every strategy at,
/// regardless of the strategy's own setup.
pub const NORMALIZED_SETUP_POINTS: f64 = 100.0;

/// Wear multiplier relative to the Medium compound.
pub(crate) const COMPOUND_WEAR_MULTIPLIERS: [(Compound, f64); 4] = [
    (Compound::SuperSoft, 2.06),
    (Compound::Soft, 0.642),
    (Compound::Medium, 1.00),
    (Compound::Hard, 0.375),
];

/// `remaining >= threshold` selects the tier.
pub(crate) const PERFORMANCE_TIERS: [(f64, PerformanceImpact); 4] = [
    (80.0, PerformanceImpact::Excellent),
    (60.0, PerformanceImpact::Good),
    (40.0, PerformanceImpact::Acceptable),
    (20.0, PerformanceImpact::Degraded),
];

/// `remaining > threshold` selects the window.
pub(crate) const PIT_WINDOW_TIERS: [(f64, PitWindow); 3] = [
    (70.0, PitWindow::Continue),
    (40.0, PitWindow::ConsiderStopping),
    (20.0, PitWindow::StopSoon),
];

/// `fuel_per_km < threshold` selects the rating.
pub(crate) const FUEL_EFFICIENCY_TIERS: [(f64, FuelEfficiency); 4] = [
    (0.5, FuelEfficiency::Excellent),
    (0.7, FuelEfficiency::Good),
    (1.0, FuelEfficiency::Medium),
    (1.3, FuelEfficiency::Poor),
];

pub fn compound_wear_multiplier(compound: Compound) -> f64 {
    COMPOUND_WEAR_MULTIPLIERS
        .iter()
        .find(|(c, _)| *c == compound)
        .map_or(1.0, |(_, m)| *m)
}

/// Multiplier for a free-form compound name; unknown names wear like Medium.
pub fn wear_multiplier_by_name(name: &str) -> f64 {
    Compound::from_name(name).map_or(1.0, compound_wear_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_match_table() {
        let expected = [
            (Compound::SuperSoft, 2.06),
            (Compound::Soft, 0.642),
            (Compound::Medium, 1.0),
            (Compound::Hard, 0.375),
        ];
        for (compound, multiplier) in expected {
            assert!((compound_wear_multiplier(compound) - multiplier).abs() < 1e-12);
        }
    }

    #[test]
    fn multiplier_ordering() {
        let m = compound_wear_multiplier;
        assert!(m(Compound::Hard) < m(Compound::Soft));
        assert!(m(Compound::Soft) < m(Compound::Medium));
        assert!(m(Compound::Medium) < m(Compound::SuperSoft));
    }

    #[test]
    fn name_lookup_is_case_insensitive_with_medium_fallback() {
        assert!((wear_multiplier_by_name("HARD") - 0.375).abs() < 1e-12);
        assert!((wear_multiplier_by_name("SuperSoft") - 2.06).abs() < 1e-12);
        assert!((wear_multiplier_by_name("slick") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiers_are_descending() {
        assert!(PERFORMANCE_TIERS.windows(2).all(|w| w[0].0 > w[1].0));
        assert!(PIT_WINDOW_TIERS.windows(2).all(|w| w[0].0 > w[1].0));
        assert!(FUEL_EFFICIENCY_TIERS.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
