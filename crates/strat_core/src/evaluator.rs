//! Strategy scoring and optimization.

use serde::Serialize;

use crate::tables::{compound_wear_multiplier, NORMALIZED_SETUP_POINTS};
use crate::tyre::stint_wear;
use crate::{
    clamp_points, generate_strategies, require_laps, Circuit, PlannerContent, Result, Strategy,
    StrategyConstraints,
};

const STARTING_SCORE: i64 = 100;
const PIT_STOP_PENALTY: i64 = 15;
const WORN_OUT_PENALTY: i64 = 30;
const HEAVY_WEAR_PENALTY: i64 = 15;
const UNDERUSED_TYRE_PENALTY: i64 = 5;
const STINT_LENGTH_BONUS: i64 = 5;
const BONUS_STINT_LAPS: std::ops::RangeInclusive<u32> = 8..=25;
const ALTERNATIVE_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStrategy {
    pub score: u32,
    pub description: String,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimization {
    /// `None` when the constraints admit no candidate at all.
    pub recommended: Option<ScoredStrategy>,
    pub alternatives: Vec<ScoredStrategy>,
    pub candidates_considered: usize,
}

/// Scores a strategy on `circuit`. Tyre wear is always judged at
/// [`NORMALIZED_SETUP_POINTS`], not the strategy's own tyre points.
/// A zero-lap stint is scored as worn out: it costs a stop and gains nothing.
pub fn evaluate(strategy: &Strategy, circuit: &Circuit) -> u32 {
    let stops = i64::try_from(strategy.stints.len().saturating_sub(1)).unwrap_or(i64::MAX / 2);
    let mut score = STARTING_SCORE - stops.saturating_mul(PIT_STOP_PENALTY);

    for stint in &strategy.stints {
        if stint.laps == 0 {
            score -= WORN_OUT_PENALTY;
            continue;
        }
        let wear = stint_wear(
            circuit,
            compound_wear_multiplier(stint.compound),
            stint.laps,
            NORMALIZED_SETUP_POINTS,
        );
        if wear.remaining < 20.0 {
            score -= WORN_OUT_PENALTY;
        } else if wear.remaining < 40.0 {
            score -= HEAVY_WEAR_PENALTY;
        } else if wear.remaining > 80.0 {
            score -= UNDERUSED_TYRE_PENALTY;
        }
        if BONUS_STINT_LAPS.contains(&stint.laps) {
            score += STINT_LENGTH_BONUS;
        }
    }

    u32::try_from(score.max(0)).unwrap_or(u32::MAX)
}

/// Inserts keeping `ranked` sorted by descending score; ties keep arrival order.
fn insert_ranked(ranked: &mut Vec<ScoredStrategy>, entry: ScoredStrategy, keep: usize) {
    let at = ranked.partition_point(|existing| existing.score >= entry.score);
    if at < keep {
        ranked.insert(at, entry);
        ranked.truncate(keep);
    }
}

pub fn optimize_strategy(
    content: &PlannerContent,
    circuit_code: &str,
    total_laps: u32,
    tyre_points: f64,
    fuel_points: f64,
    constraints: &StrategyConstraints,
) -> Result<Optimization> {
    let circuit = content.circuit(circuit_code)?;
    let total_laps = require_laps("total_laps", total_laps)?;
    let tyre_points = clamp_points("tyre_points", tyre_points)?;
    let fuel_points = clamp_points("fuel_points", fuel_points)?;

    let keep = ALTERNATIVE_COUNT + 1;
    let mut ranked: Vec<ScoredStrategy> = Vec::with_capacity(keep + 1);
    let mut candidates_considered = 0;
    for strategy in generate_strategies(
        content,
        circuit_code,
        total_laps,
        tyre_points,
        fuel_points,
        constraints,
    ) {
        candidates_considered += 1;
        let score = evaluate(&strategy, circuit);
        let entry = ScoredStrategy {
            score,
            description: strategy.description(),
            strategy,
        };
        insert_ranked(&mut ranked, entry, keep);
    }

    tracing::debug!(
        circuit = circuit_code,
        total_laps,
        candidates_considered,
        best = ranked.first().map(|s| s.score),
        "strategy optimization finished"
    );

    let mut ranked = ranked.into_iter();
    Ok(Optimization {
        recommended: ranked.next(),
        alternatives: ranked.collect(),
        candidates_considered,
    })
}
