//! Strategy analysis and side-by-side comparison.

use serde::Serialize;

use crate::tables::{compound_wear_multiplier, NORMALIZED_SETUP_POINTS};
use crate::tyre::stint_wear;
use crate::{compute_stint_fuel, PlannerContent, Result, Strategy};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAnalysis {
    pub estimated_time_s: f64,
    pub total_fuel: f64,
    pub risk_level: u32,
    pub pit_stops: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProsCons {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub description: String,
    pub analysis: StrategyAnalysis,
    pub pros_cons: ProsCons,
}

/// Indices point into `entries`; `None` only when the list is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
    pub fastest: Option<usize>,
    pub most_fuel_efficient: Option<usize>,
    pub safest: Option<usize>,
}

/// Time, fuel and risk estimate for `strategy` on `circuit_code`.
///
/// Fuel and tyre risk are both judged at [`NORMALIZED_SETUP_POINTS`]; lap time is
/// the flat `base_lap_time_s` from content.
pub fn analyze_strategy(
    content: &PlannerContent,
    strategy: &Strategy,
    circuit_code: &str,
) -> Result<StrategyAnalysis> {
    let circuit = content.circuit(circuit_code)?;
    let constants = &content.constants;
    let pit_stops = strategy.pit_stops();

    let mut total_fuel = 0.0;
    let mut risk_level = 0;
    for stint in &strategy.stints {
        let fuel = compute_stint_fuel(
            content,
            circuit_code,
            NORMALIZED_SETUP_POINTS,
            stint.laps,
            stint.boost,
        )?;
        total_fuel += fuel.total_fuel;

        let wear = stint_wear(
            circuit,
            compound_wear_multiplier(stint.compound),
            stint.laps,
            NORMALIZED_SETUP_POINTS,
        );
        if wear.remaining < 30.0 {
            risk_level += 2;
        } else if wear.remaining < 50.0 {
            risk_level += 1;
        }
    }

    let estimated_time_s = f64::from(strategy.total_laps()) * constants.base_lap_time_s
        + f64::from(pit_stops) * constants.pit_stop_time_s;

    Ok(StrategyAnalysis {
        estimated_time_s,
        total_fuel,
        risk_level,
        pit_stops,
    })
}

pub fn pros_and_cons(analysis: &StrategyAnalysis) -> ProsCons {
    let mut verdict = ProsCons::default();
    match analysis.pit_stops {
        0 => verdict.pros.push("no time lost in the pits".to_string()),
        1 => verdict.pros.push("single pit stop".to_string()),
        2 => {}
        _ => verdict.cons.push("multiple stops, time lost".to_string()),
    }
    if analysis.risk_level == 0 {
        verdict.pros.push("very safe strategy".to_string());
    }
    if analysis.risk_level >= 3 {
        verdict.cons.push("high degradation risk".to_string());
    }
    if analysis.risk_level >= 5 {
        verdict.cons.push("very risky strategy".to_string());
    }
    verdict
}

/// Indexes the first entry minimizing `key`.
fn best_by(entries: &[ComparisonEntry], key: impl Fn(&StrategyAnalysis) -> f64) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, entry)| {
            let value = key(&entry.analysis);
            match best {
                Some((_, current)) if current <= value => best,
                _ => Some((index, value)),
            }
        })
        .map(|(index, _)| index)
}

pub fn compare_strategies(
    content: &PlannerContent,
    strategies: &[Strategy],
    circuit_code: &str,
) -> Result<Comparison> {
    let entries = strategies
        .iter()
        .map(|strategy| {
            let analysis = analyze_strategy(content, strategy, circuit_code)?;
            Ok(ComparisonEntry {
                description: strategy.description(),
                pros_cons: pros_and_cons(&analysis),
                analysis,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Comparison {
        fastest: best_by(&entries, |a| a.estimated_time_s),
        most_fuel_efficient: best_by(&entries, |a| a.total_fuel),
        safest: best_by(&entries, |a| f64::from(a.risk_level)),
        entries,
    })
}
