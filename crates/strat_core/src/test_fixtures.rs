//! Shared test fixtures for strat_core and downstream crates.
//!
//! `base_content()` carries three circuits and the full boost table with the
//! same figures the shipped content uses, so expectations worked out by hand
//! against real circuits hold in unit tests.

use std::collections::BTreeMap;

use crate::{
    BoostLevel, BoostLevelDef, Circuit, CircuitCode, Compound, Constants, Difficulty,
    PlannerContent, Strategy,
};

#[allow(clippy::too_many_arguments)]
fn circuit(
    code: &str,
    name: &str,
    length_km: f64,
    laps: u32,
    tyre_wear_pct: f64,
    difficulty: Difficulty,
    country_code: &str,
    timezone: &str,
) -> Circuit {
    Circuit {
        code: CircuitCode::from(code),
        name: name.to_string(),
        length_km,
        laps,
        tyre_wear_pct,
        difficulty,
        country_code: country_code.to_string(),
        timezone: timezone.to_string(),
    }
}

fn boost(level: BoostLevel, multiplier: f64, label: &str, lap_time_delta_s: f64) -> BoostLevelDef {
    BoostLevelDef {
        level,
        multiplier,
        label: label.to_string(),
        lap_time_delta_s,
    }
}

pub fn base_content() -> PlannerContent {
    let circuits = [
        circuit(
            "france",
            "Circuit Paul Ricard",
            5.881,
            24,
            80.0,
            Difficulty::Medium,
            "FR",
            "Europe/Paris",
        ),
        circuit(
            "monaco",
            "Circuit de Monaco",
            4.015,
            29,
            20.0,
            Difficulty::VeryHard,
            "MC",
            "Europe/Monaco",
        ),
        circuit(
            "italy",
            "Autodromo Nazionale Monza",
            5.793,
            21,
            45.0,
            Difficulty::Easy,
            "IT",
            "Europe/Rome",
        ),
    ];

    PlannerContent {
        content_version: "test".to_string(),
        circuits: circuits
            .into_iter()
            .map(|c| (c.code.clone(), c))
            .collect::<BTreeMap<_, _>>(),
        boost_levels: vec![
            boost(BoostLevel::VeryHigh, 1.04, "Very High", -0.8),
            boost(BoostLevel::High, 1.0161, "High", -0.4),
            boost(BoostLevel::Neutral, 1.0, "Neutral", 0.0),
            boost(BoostLevel::Low, 0.988, "Low", 0.45),
            boost(BoostLevel::VeryLow, 0.9799, "Very Low", 0.9),
        ],
        constants: Constants {
            max_strategy_stints: 5,
            base_lap_time_s: 90.0,
            pit_stop_time_s: 25.0,
        },
    }
}

/// France strategy at 49 tyre / 80 fuel points, all stints at neutral boost.
pub fn france_strategy(stints: &[(Compound, u32)]) -> Strategy {
    stints.iter().fold(
        Strategy::new(CircuitCode::from("france"), 49.0, 80.0),
        |strategy, &(compound, laps)| strategy.with_stint(compound, laps, BoostLevel::Neutral),
    )
}
