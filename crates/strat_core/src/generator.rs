//! Candidate strategy enumeration.
//!
//! Candidates come out lazily: stint count ascending, then in compound
//! preference order. Malformed candidates are dropped, never reported.

use serde::{Deserialize, Serialize};

use crate::tables::compound_wear_multiplier;
use crate::tyre::stint_wear;
use crate::{BoostLevel, Circuit, Compound, PlannerContent, Strategy};

const DEFAULT_MAX_STINT_FRACTION: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConstraints {
    pub max_stints: u32,
    pub preferred_compounds: Vec<Compound>,
    pub min_stint_length: u32,
    /// `None` means `floor(total_laps * 0.7)`.
    pub max_stint_length: Option<u32>,
}

impl Default for StrategyConstraints {
    fn default() -> Self {
        Self {
            max_stints: 3,
            preferred_compounds: vec![Compound::Medium, Compound::Soft],
            min_stint_length: 5,
            max_stint_length: None,
        }
    }
}

impl StrategyConstraints {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_stint_length_for(&self, total_laps: u32) -> u32 {
        self.max_stint_length
            .unwrap_or_else(|| (f64::from(total_laps) * DEFAULT_MAX_STINT_FRACTION).floor() as u32)
    }
}

/// Why a synthesized candidate was dropped.
#[derive(Debug)]
enum InvalidStrategy {
    LapSumMismatch { planned: u32, expected: u32 },
    EmptyStint { position: u32 },
    UnusableTyres { position: u32 },
}

impl std::fmt::Display for InvalidStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidStrategy::LapSumMismatch { planned, expected } => {
                write!(f, "plans {planned} laps, race has {expected}")
            }
            InvalidStrategy::EmptyStint { position } => write!(f, "stint {position} has no laps"),
            InvalidStrategy::UnusableTyres { position } => {
                write!(f, "stint {position} has no finite tyre life")
            }
        }
    }
}

/// Lazy, finite, single-pass sequence of candidate strategies.
#[derive(Debug)]
pub struct StrategyCandidates<'a> {
    circuit: Option<&'a Circuit>,
    total_laps: u32,
    tyre_points: f64,
    fuel_points: f64,
    constraints: StrategyConstraints,
    max_stint_length: u32,
    /// Highest stint count tried. Counts above the lap total average zero laps.
    stint_limit: u32,
    stint_count: u32,
    compound_index: usize,
}

pub fn generate_strategies<'a>(
    content: &'a PlannerContent,
    circuit_code: &str,
    total_laps: u32,
    tyre_points: f64,
    fuel_points: f64,
    constraints: &StrategyConstraints,
) -> StrategyCandidates<'a> {
    let circuit = content.get_circuit(circuit_code);
    if circuit.is_none() {
        tracing::debug!(circuit_code, "no candidates for unknown circuit");
    }
    StrategyCandidates {
        circuit,
        total_laps,
        tyre_points,
        fuel_points,
        max_stint_length: constraints.max_stint_length_for(total_laps),
        stint_limit: constraints.max_stints.min(total_laps),
        constraints: constraints.clone(),
        stint_count: 1,
        compound_index: 0,
    }
}

impl StrategyCandidates<'_> {
    /// Stint counts whose even split falls outside the length bounds are skipped.
    fn stint_count_in_bounds(&self) -> bool {
        let average = self.total_laps / self.stint_count;
        (self.constraints.min_stint_length..=self.max_stint_length).contains(&average)
    }

    fn advance_stint_count(&mut self) {
        match self.stint_count.checked_add(1) {
            Some(next) => self.stint_count = next,
            None => self.stint_limit = 0,
        }
        self.compound_index = 0;
    }

    fn synthesize(&self, circuit: &Circuit, preferred: Compound) -> Strategy {
        let count = self.stint_count;
        let base = self.total_laps / count;
        let remainder = self.total_laps % count;
        let mut strategy = Strategy::new(circuit.code.clone(), self.tyre_points, self.fuel_points);
        for index in 0..count {
            let is_last = index + 1 == count;
            let compound = if count == 1 {
                preferred
            } else if index == 0 {
                Compound::Soft
            } else if is_last {
                Compound::Hard
            } else {
                preferred
            };
            let laps = if is_last { base + remainder } else { base };
            strategy.push_stint(compound, laps, BoostLevel::Neutral);
        }
        strategy
    }

    fn validate(&self, circuit: &Circuit, strategy: &Strategy) -> Result<(), InvalidStrategy> {
        let planned = strategy.total_laps();
        if planned != self.total_laps {
            return Err(InvalidStrategy::LapSumMismatch {
                planned,
                expected: self.total_laps,
            });
        }
        for stint in &strategy.stints {
            if stint.laps == 0 {
                return Err(InvalidStrategy::EmptyStint {
                    position: stint.position,
                });
            }
            let wear = stint_wear(
                circuit,
                compound_wear_multiplier(stint.compound),
                stint.laps,
                self.tyre_points,
            );
            if !wear.remaining.is_finite() {
                return Err(InvalidStrategy::UnusableTyres {
                    position: stint.position,
                });
            }
        }
        Ok(())
    }
}

impl Iterator for StrategyCandidates<'_> {
    type Item = Strategy;

    fn next(&mut self) -> Option<Strategy> {
        let circuit = self.circuit?;
        if !(self.tyre_points > 0.0 && self.fuel_points > 0.0) {
            return None;
        }
        while self.stint_count <= self.stint_limit {
            if !self.stint_count_in_bounds() {
                self.advance_stint_count();
                continue;
            }
            let Some(&preferred) = self.constraints.preferred_compounds.get(self.compound_index)
            else {
                self.advance_stint_count();
                continue;
            };
            self.compound_index += 1;

            let candidate = self.synthesize(circuit, preferred);
            match self.validate(circuit, &candidate) {
                Ok(()) => return Some(candidate),
                Err(reason) => {
                    tracing::trace!(%reason, stints = self.stint_count, "dropping candidate");
                }
            }
        }
        None
    }
}
