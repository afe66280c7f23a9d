//! Type definitions for `strat_core`.
//!
//! Reference content (circuits, boost table, constants) and the strategy types
//! callers build and pass into the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{PlannerError, Result};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(CircuitCode);

/// Lowercases and strips separators so `"Very_High"`, `"very-high"` and
/// `"VeryHigh"` compare equal.
fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// Tyre hardness grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Compound {
    SuperSoft,
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 4] = [
        Compound::SuperSoft,
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
    ];

    /// Case-insensitive lookup; `None` for names outside the four grades.
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_key(name).as_str() {
            "supersoft" | "ss" => Some(Compound::SuperSoft),
            "soft" | "s" => Some(Compound::Soft),
            "medium" | "m" => Some(Compound::Medium),
            "hard" | "h" => Some(Compound::Hard),
            _ => None,
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Compound::SuperSoft => "SS",
            Compound::Soft => "S",
            Compound::Medium => "M",
            Compound::Hard => "H",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compound::SuperSoft => "SuperSoft",
            Compound::Soft => "Soft",
            Compound::Medium => "Medium",
            Compound::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Compound {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        Compound::from_name(s).ok_or_else(|| PlannerError::InvalidInput {
            field: "compound",
            reason: format!("unknown compound '{s}'"),
        })
    }
}

impl TryFrom<String> for Compound {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Driving intensity for a stint.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum BoostLevel {
    VeryHigh,
    High,
    #[default]
    Neutral,
    Low,
    VeryLow,
}

impl BoostLevel {
    pub const ALL: [BoostLevel; 5] = [
        BoostLevel::VeryHigh,
        BoostLevel::High,
        BoostLevel::Neutral,
        BoostLevel::Low,
        BoostLevel::VeryLow,
    ];

    /// Never fails: anything unrecognized is `Neutral`.
    pub fn from_key(key: &str) -> Self {
        match normalize_key(key).as_str() {
            "veryhigh" => BoostLevel::VeryHigh,
            "high" => BoostLevel::High,
            "low" => BoostLevel::Low,
            "verylow" => BoostLevel::VeryLow,
            _ => BoostLevel::Neutral,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            BoostLevel::VeryHigh => "very_high",
            BoostLevel::High => "high",
            BoostLevel::Neutral => "neutral",
            BoostLevel::Low => "low",
            BoostLevel::VeryLow => "very_low",
        }
    }
}

impl From<String> for BoostLevel {
    fn from(value: String) -> Self {
        BoostLevel::from_key(&value)
    }
}

impl fmt::Display for BoostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[serde(rename = "Very Hard", alias = "VeryHard")]
    VeryHard,
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    pub code: CircuitCode,
    pub name: String,
    pub length_km: f64,
    /// Race distance in laps.
    pub laps: u32,
    /// Base tyre wear percentage, 0–100.
    pub tyre_wear_pct: f64,
    pub difficulty: Difficulty,
    pub country_code: String,
    pub timezone: String,
}

/// One row of the boost table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostLevelDef {
    pub level: BoostLevel,
    /// Fuel multiplier relative to neutral.
    pub multiplier: f64,
    pub label: String,
    /// Lap time change per lap in seconds; negative is faster.
    pub lap_time_delta_s: f64,
}

impl BoostLevelDef {
    fn neutral() -> Self {
        Self {
            level: BoostLevel::Neutral,
            multiplier: 1.0,
            label: "Neutral".to_string(),
            lap_time_delta_s: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    /// Upper bound on stints in a user-built strategy.
    pub max_strategy_stints: u32,
    /// Flat lap time used for strategy time estimates. Not circuit-specific.
    pub base_lap_time_s: f64,
    pub pit_stop_time_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerContent {
    pub content_version: String,
    pub circuits: BTreeMap<CircuitCode, Circuit>,
    pub boost_levels: Vec<BoostLevelDef>,
    pub constants: Constants,
}

impl PlannerContent {
    pub fn get_circuit(&self, code: &str) -> Option<&Circuit> {
        self.circuits.get(code)
    }

    pub fn circuit(&self, code: &str) -> Result<&Circuit> {
        self.get_circuit(code)
            .ok_or_else(|| PlannerError::UnknownCircuit(code.to_string()))
    }

    /// Circuits in code order.
    pub fn iter_circuits(&self) -> impl Iterator<Item = &Circuit> {
        self.circuits.values()
    }

    /// Table row for `level`; a level missing from the table resolves like neutral.
    pub fn boost_level(&self, level: BoostLevel) -> BoostLevelDef {
        let find = |wanted: BoostLevel| self.boost_levels.iter().find(|def| def.level == wanted);
        find(level)
            .or_else(|| find(BoostLevel::Neutral))
            .cloned()
            .unwrap_or_else(BoostLevelDef::neutral)
    }

    pub fn boost_level_by_key(&self, key: &str) -> BoostLevelDef {
        self.boost_level(BoostLevel::from_key(key))
    }
}

// ---------------------------------------------------------------------------
// Strategy types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    /// 1-based position within the strategy.
    pub position: u32,
    pub compound: Compound,
    pub laps: u32,
    #[serde(default)]
    pub boost: BoostLevel,
}

/// Stint as written in a strategy file. Any `position` present is ignored.
#[derive(Deserialize)]
struct StintPlan {
    compound: Compound,
    laps: u32,
    #[serde(default)]
    boost: BoostLevel,
}

#[derive(Deserialize)]
struct StrategyPlan {
    circuit: CircuitCode,
    tyre_points: f64,
    fuel_points: f64,
    stints: Vec<StintPlan>,
}

impl From<StrategyPlan> for Strategy {
    fn from(plan: StrategyPlan) -> Self {
        plan.stints.into_iter().fold(
            Strategy::new(plan.circuit, plan.tyre_points, plan.fuel_points),
            |strategy, stint| strategy.with_stint(stint.compound, stint.laps, stint.boost),
        )
    }
}

/// Positions are renumbered from list order on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StrategyPlan")]
pub struct Strategy {
    pub circuit: CircuitCode,
    pub tyre_points: f64,
    pub fuel_points: f64,
    pub stints: SmallVec<[Stint; 5]>,
}

/// Outcome of checking a user-built strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyCheck {
    pub stint_count: usize,
    pub planned_laps: u32,
    pub race_laps: u32,
    /// Advisory only: user strategies may deliberately plan a partial race.
    pub laps_match: bool,
}

impl Strategy {
    pub fn new(circuit: CircuitCode, tyre_points: f64, fuel_points: f64) -> Self {
        Self {
            circuit,
            tyre_points,
            fuel_points,
            stints: SmallVec::new(),
        }
    }

    /// Appends a stint at the next position.
    pub fn push_stint(&mut self, compound: Compound, laps: u32, boost: BoostLevel) {
        let position = u32::try_from(self.stints.len()).unwrap_or(u32::MAX - 1) + 1;
        self.stints.push(Stint {
            position,
            compound,
            laps,
            boost,
        });
    }

    pub fn with_stint(mut self, compound: Compound, laps: u32, boost: BoostLevel) -> Self {
        self.push_stint(compound, laps, boost);
        self
    }

    pub fn total_laps(&self) -> u32 {
        self.stints.iter().map(|s| s.laps).sum()
    }

    pub fn pit_stops(&self) -> u32 {
        u32::try_from(self.stints.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Compact summary, e.g. `S(12) → H(12)`.
    pub fn description(&self) -> String {
        self.stints
            .iter()
            .map(|s| format!("{}({})", s.compound.short(), s.laps))
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Fuel for the whole plan at the strategy's own fuel points and per-stint boost.
    pub fn total_fuel(&self, content: &PlannerContent) -> Result<f64> {
        self.stints.iter().try_fold(0.0, |acc, stint| {
            let fuel = crate::compute_stint_fuel(
                content,
                &self.circuit.0,
                self.fuel_points,
                stint.laps,
                stint.boost,
            )?;
            Ok(acc + fuel.total_fuel)
        })
    }

    /// Validates shape against the content limits. A lap total different from
    /// the race distance is reported through `laps_match`, not as an error.
    pub fn check(&self, content: &PlannerContent) -> Result<StrategyCheck> {
        let circuit = content.circuit(&self.circuit.0)?;
        let max = content.constants.max_strategy_stints as usize;
        if self.stints.is_empty() || self.stints.len() > max {
            return Err(PlannerError::InvalidInput {
                field: "stints",
                reason: format!("expected 1 to {max} stints, got {}", self.stints.len()),
            });
        }
        if let Some(stint) = self.stints.iter().find(|s| s.laps == 0) {
            return Err(PlannerError::InvalidInput {
                field: "stints",
                reason: format!("stint {} has no laps", stint.position),
            });
        }
        let planned_laps = self.total_laps();
        Ok(StrategyCheck {
            stint_count: self.stints.len(),
            planned_laps,
            race_laps: circuit.laps,
            laps_match: planned_laps == circuit.laps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, france_strategy};

    #[test]
    fn compound_names_are_case_insensitive() {
        assert_eq!(Compound::from_name("supersoft"), Some(Compound::SuperSoft));
        assert_eq!(Compound::from_name("SUPER_SOFT"), Some(Compound::SuperSoft));
        assert_eq!(Compound::from_name("Hard"), Some(Compound::Hard));
        assert_eq!(Compound::from_name("intermediate"), None);
    }

    #[test]
    fn compound_deserializes_any_case() {
        let compound: Compound = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(compound, Compound::Medium);
        assert!(serde_json::from_str::<Compound>("\"wet\"").is_err());
    }

    #[test]
    fn unknown_boost_key_is_neutral() {
        assert_eq!(BoostLevel::from_key("turbo"), BoostLevel::Neutral);
        assert_eq!(BoostLevel::from_key(""), BoostLevel::Neutral);
        assert_eq!(BoostLevel::from_key("Very-High"), BoostLevel::VeryHigh);
        let level: BoostLevel = serde_json::from_str("\"warp\"").unwrap();
        assert_eq!(level, BoostLevel::Neutral);
    }

    #[test]
    fn boost_serializes_as_key() {
        let json = serde_json::to_string(&BoostLevel::VeryLow).unwrap();
        assert_eq!(json, "\"very_low\"");
        let back: BoostLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BoostLevel::VeryLow);
    }

    #[test]
    fn difficulty_uses_display_label() {
        let json = serde_json::to_string(&Difficulty::VeryHard).unwrap();
        assert_eq!(json, "\"Very Hard\"");
        let alias: Difficulty = serde_json::from_str("\"VeryHard\"").unwrap();
        assert_eq!(alias, Difficulty::VeryHard);
    }

    #[test]
    fn circuit_lookup() {
        let content = base_content();
        assert_eq!(content.circuit("monaco").unwrap().laps, 29);
        assert_eq!(
            content.circuit("atlantis").unwrap_err(),
            PlannerError::UnknownCircuit("atlantis".to_string())
        );
    }

    #[test]
    fn missing_boost_row_resolves_like_neutral() {
        let mut content = base_content();
        content
            .boost_levels
            .retain(|def| def.level != BoostLevel::High);
        assert_eq!(
            content.boost_level(BoostLevel::High),
            content.boost_level(BoostLevel::Neutral)
        );
    }

    #[test]
    fn push_stint_numbers_positions() {
        let strategy = france_strategy(&[(Compound::Soft, 12), (Compound::Hard, 12)]);
        let positions: Vec<u32> = strategy.stints.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(strategy.total_laps(), 24);
        assert_eq!(strategy.pit_stops(), 1);
        assert_eq!(strategy.description(), "S(12) → H(12)");
    }

    #[test]
    fn check_reports_lap_mismatch_without_failing() {
        let content = base_content();
        let strategy = france_strategy(&[(Compound::Soft, 10), (Compound::Hard, 10)]);
        let check = strategy.check(&content).unwrap();
        assert_eq!(check.planned_laps, 20);
        assert_eq!(check.race_laps, 24);
        assert!(!check.laps_match);
    }

    #[test]
    fn check_rejects_too_many_stints() {
        let content = base_content();
        let strategy = france_strategy(&[(Compound::Soft, 4); 6]);
        assert!(matches!(
            strategy.check(&content),
            Err(PlannerError::InvalidInput {
                field: "stints",
                ..
            })
        ));
    }

    #[test]
    fn check_rejects_empty_stint() {
        let content = base_content();
        let strategy = france_strategy(&[(Compound::Soft, 24), (Compound::Hard, 0)]);
        assert!(strategy.check(&content).is_err());
    }

    #[test]
    fn strategy_files_number_stints_in_order() {
        let json = r#"{
            "circuit": "france",
            "tyre_points": 60,
            "fuel_points": 70,
            "stints": [
                { "compound": "soft", "laps": 10, "position": 7 },
                { "compound": "Hard", "laps": 14, "boost": "low" }
            ]
        }"#;
        let strategy: Strategy = serde_json::from_str(json).unwrap();
        let positions: Vec<u32> = strategy.stints.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(strategy.stints[0].boost, BoostLevel::Neutral);
        assert_eq!(strategy.stints[1].boost, BoostLevel::Low);
        assert_eq!(strategy.description(), "S(10) → H(14)");
    }

    #[test]
    fn total_fuel_sums_stints() {
        let content = base_content();
        let strategy = france_strategy(&[(Compound::Soft, 12), (Compound::Hard, 12)]);
        let race = crate::compute_race_fuel(&content, "france", strategy.fuel_points).unwrap();
        let total = strategy.total_fuel(&content).unwrap();
        assert!((total - race.fuel).abs() < 1e-9);
    }
}
