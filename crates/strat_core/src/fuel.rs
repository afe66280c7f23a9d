//! Fuel consumption model.
//!
//! Fuel per kilometre follows an inverse power of the car's fuel points, so
//! doubling the points saves noticeably less than half the fuel.

use serde::Serialize;

use crate::tables::FUEL_EFFICIENCY_TIERS;
use crate::{
    clamp_points, require_laps, BoostLevel, BoostLevelDef, CircuitCode, PlannerContent, Result,
};

const FUEL_COEFFICIENT: f64 = 98.456_44;
const FUEL_POINTS_EXPONENT: f64 = -0.088_463;
const FUEL_DISTANCE_DIVISOR: f64 = 139.771;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelEfficiency {
    Excellent,
    Good,
    Medium,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl FuelEfficiency {
    pub(crate) fn from_fuel_per_km(fuel_per_km: f64) -> Self {
        FUEL_EFFICIENCY_TIERS
            .iter()
            .find(|(threshold, _)| fuel_per_km < *threshold)
            .map_or(FuelEfficiency::VeryPoor, |(_, rating)| *rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceDirection {
    Faster,
    Slower,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapTimeImpact {
    pub seconds_per_lap: f64,
    pub total_seconds: f64,
    pub direction: PaceDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceFuel {
    pub circuit: CircuitCode,
    pub fuel_points: f64,
    pub total_distance_km: f64,
    pub fuel: f64,
    pub fuel_per_lap: f64,
    pub fuel_per_km: f64,
    pub efficiency: FuelEfficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StintFuel {
    pub circuit: CircuitCode,
    pub fuel_points: f64,
    pub laps: u32,
    pub boost: BoostLevelDef,
    /// Per-lap fuel before the boost multiplier.
    pub base_fuel_per_lap: f64,
    pub fuel_per_lap: f64,
    pub total_fuel: f64,
    /// Fuel saved (or spent extra) relative to neutral boost, always non-negative.
    pub fuel_saving: f64,
    pub lap_time_impact: LapTimeImpact,
}

/// Fuel per kilometre for already-clamped fuel points.
pub fn fuel_per_km(fuel_points: f64) -> f64 {
    FUEL_COEFFICIENT * fuel_points.powf(FUEL_POINTS_EXPONENT) / FUEL_DISTANCE_DIVISOR
}

pub fn compute_lap_fuel(
    content: &PlannerContent,
    circuit_code: &str,
    fuel_points: f64,
) -> Result<f64> {
    let circuit = content.circuit(circuit_code)?;
    let fuel_points = clamp_points("fuel_points", fuel_points)?;
    Ok(fuel_per_km(fuel_points) * circuit.length_km)
}

pub fn compute_race_fuel(
    content: &PlannerContent,
    circuit_code: &str,
    fuel_points: f64,
) -> Result<RaceFuel> {
    let circuit = content.circuit(circuit_code)?;
    let fuel_points = clamp_points("fuel_points", fuel_points)?;
    let laps = require_laps("lap_count", circuit.laps)?;
    let total_distance_km = circuit.length_km * f64::from(laps);
    let fuel = fuel_per_km(fuel_points) * total_distance_km;
    let fuel_per_lap = fuel / f64::from(laps);
    let per_km = fuel_per_lap / circuit.length_km;
    Ok(RaceFuel {
        circuit: circuit.code.clone(),
        fuel_points,
        total_distance_km,
        fuel,
        fuel_per_lap,
        fuel_per_km: per_km,
        efficiency: FuelEfficiency::from_fuel_per_km(per_km),
    })
}

pub fn compute_stint_fuel(
    content: &PlannerContent,
    circuit_code: &str,
    fuel_points: f64,
    laps: u32,
    boost: BoostLevel,
) -> Result<StintFuel> {
    let circuit = content.circuit(circuit_code)?;
    let fuel_points = clamp_points("fuel_points", fuel_points)?;
    let laps = require_laps("lap_count", laps)?;
    let boost = content.boost_level(boost);

    let base_fuel_per_lap = fuel_per_km(fuel_points) * circuit.length_km;
    let lap_count = f64::from(laps);
    let total_fuel = base_fuel_per_lap * lap_count * boost.multiplier;
    let fuel_saving = ((1.0 - boost.multiplier) * base_fuel_per_lap * lap_count).abs();

    let total_seconds = boost.lap_time_delta_s * lap_count;
    let direction = if total_seconds < 0.0 {
        PaceDirection::Faster
    } else if total_seconds > 0.0 {
        PaceDirection::Slower
    } else {
        PaceDirection::Neutral
    };

    Ok(StintFuel {
        circuit: circuit.code.clone(),
        fuel_points,
        laps,
        lap_time_impact: LapTimeImpact {
            seconds_per_lap: boost.lap_time_delta_s,
            total_seconds,
            direction,
        },
        boost,
        base_fuel_per_lap,
        fuel_per_lap: total_fuel / lap_count,
        total_fuel,
        fuel_saving,
    })
}
