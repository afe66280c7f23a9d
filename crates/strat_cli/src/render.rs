//! Plain-text output for the terminal.

use strat_core::{
    Circuit, Comparison, Optimization, ProsCons, RaceFuel, StintFuel, Strategy, StrategyAnalysis,
    StrategyCheck, TyreWearResult,
};

pub fn circuits(circuits: &[&Circuit]) {
    println!(
        "{:<14} {:<36} {:>8} {:>5} {:>6}  difficulty",
        "code", "name", "km", "laps", "wear%"
    );
    println!("{}", "-".repeat(80));
    for c in circuits {
        println!(
            "{:<14} {:<36} {:>8.3} {:>5} {:>6.1}  {:?}",
            c.code.0, c.name, c.length_km, c.laps, c.tyre_wear_pct, c.difficulty
        );
    }
}

pub fn tyre_wear(result: &TyreWearResult) {
    println!(
        "{} after {} laps at {} tyre points (x{} compound)",
        result.circuit, result.laps, result.tyre_points, result.compound_multiplier
    );
    println!(
        "  wear/lap: {:.3}% medium, {:.3}% this compound",
        result.base_wear, result.compound_wear
    );
    println!(
        "  remaining: {:.2}%  total wear: {:.2}%",
        result.remaining, result.total_wear
    );
    println!(
        "  performance: {:?} ({:+.1}% pace)",
        result.performance,
        result.performance.pace_delta_pct()
    );
    println!(
        "  pit window: {} [{:?}]",
        result.pit_window.advice(),
        result.pit_window.urgency()
    );
}

pub fn race_fuel(result: &RaceFuel) {
    println!(
        "{}: {:.2} fuel over {:.3} km at {} fuel points",
        result.circuit, result.fuel, result.total_distance_km, result.fuel_points
    );
    println!(
        "  per lap: {:.3}  per km: {:.3}  efficiency: {:?}",
        result.fuel_per_lap, result.fuel_per_km, result.efficiency
    );
}

pub fn stint_fuel(result: &StintFuel) {
    println!(
        "{}: {} laps at {} boost, {:.2} fuel ({:.3} per lap, {:.3} base)",
        result.circuit,
        result.laps,
        result.boost.label,
        result.total_fuel,
        result.fuel_per_lap,
        result.base_fuel_per_lap
    );
    let impact = &result.lap_time_impact;
    println!(
        "  fuel delta vs neutral: {:.2}  lap time: {:+.2}s/lap, {:+.2}s total ({:?})",
        result.fuel_saving, impact.seconds_per_lap, impact.total_seconds, impact.direction
    );
}

pub fn candidates(candidates: &[Strategy]) {
    if candidates.is_empty() {
        println!("no strategy satisfies the constraints");
        return;
    }
    for (index, strategy) in candidates.iter().enumerate() {
        println!(
            "{:>3}. {} ({} stops)",
            index + 1,
            strategy.description(),
            strategy.pit_stops()
        );
    }
}

pub fn optimization(result: &Optimization) {
    let Some(best) = &result.recommended else {
        println!(
            "no strategy satisfies the constraints ({} candidates)",
            result.candidates_considered
        );
        return;
    };
    println!("recommended: {}  score={}", best.description, best.score);
    for alt in &result.alternatives {
        println!("  alternative: {}  score={}", alt.description, alt.score);
    }
    println!("({} candidates considered)", result.candidates_considered);
}

pub fn check(strategy: &Strategy, check: &StrategyCheck) {
    println!(
        "{} on {}: {} stints, {} of {} laps planned",
        strategy.description(),
        strategy.circuit,
        check.stint_count,
        check.planned_laps,
        check.race_laps
    );
    if !check.laps_match {
        println!("  warning: planned laps differ from the race distance");
    }
}

fn verdict(pros_cons: &ProsCons) {
    for pro in &pros_cons.pros {
        println!("  + {pro}");
    }
    for con in &pros_cons.cons {
        println!("  - {con}");
    }
}

pub fn analysis(strategy: &Strategy, analysis: &StrategyAnalysis, pros_cons: &ProsCons) {
    println!(
        "{}: {:.0}s, {:.2} fuel, risk {}, {} stops",
        strategy.description(),
        analysis.estimated_time_s,
        analysis.total_fuel,
        analysis.risk_level,
        analysis.pit_stops
    );
    verdict(pros_cons);
}

pub fn comparison(comparison: &Comparison) {
    let tag = |index: usize| {
        let mut tags = Vec::new();
        if comparison.fastest == Some(index) {
            tags.push("fastest");
        }
        if comparison.most_fuel_efficient == Some(index) {
            tags.push("most fuel efficient");
        }
        if comparison.safest == Some(index) {
            tags.push("safest");
        }
        if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        }
    };
    for (index, entry) in comparison.entries.iter().enumerate() {
        let a = &entry.analysis;
        println!(
            "{}: {:.0}s, {:.2} fuel, risk {}{}",
            entry.description,
            a.estimated_time_s,
            a.total_fuel,
            a.risk_level,
            tag(index)
        );
        verdict(&entry.pros_cons);
    }
}
