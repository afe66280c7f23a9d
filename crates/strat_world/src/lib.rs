//! Content loading shared between strat_cli, strat_daemon and strat_bench.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use strat_core::{BoostLevel, BoostLevelDef, Circuit, CircuitCode, Constants, PlannerContent};

#[derive(Deserialize)]
struct CircuitsFile {
    content_version: String,
    circuits: Vec<Circuit>,
}

#[derive(Deserialize)]
struct BoostLevelsFile {
    levels: Vec<BoostLevelDef>,
}

/// Validates loaded content, panicking on any authoring error.
///
/// Catches mistakes like a circuit with zero laps, a wear percentage outside
/// 0–100, a map key that disagrees with the circuit's own code, or a boost
/// table that is missing a level.
pub fn validate_content(content: &PlannerContent) {
    assert!(!content.circuits.is_empty(), "content has no circuits");

    for (key, circuit) in &content.circuits {
        assert!(!circuit.code.0.is_empty(), "circuit has empty code");
        assert_eq!(
            key, &circuit.code,
            "circuit '{}' is indexed under '{}'",
            circuit.code, key
        );
        assert!(
            circuit.length_km > 0.0 && circuit.length_km.is_finite(),
            "circuit '{}' has non-positive length: {}",
            circuit.code,
            circuit.length_km
        );
        assert!(circuit.laps > 0, "circuit '{}' has zero laps", circuit.code);
        assert!(
            (0.0..=100.0).contains(&circuit.tyre_wear_pct),
            "circuit '{}' tyre wear {} is outside 0-100",
            circuit.code,
            circuit.tyre_wear_pct
        );
    }

    let mut seen = HashSet::new();
    for def in &content.boost_levels {
        assert!(
            seen.insert(def.level),
            "boost level '{}' is defined twice",
            def.level
        );
        assert!(
            def.multiplier > 0.0 && def.multiplier.is_finite(),
            "boost level '{}' has non-positive multiplier: {}",
            def.level,
            def.multiplier
        );
    }
    for level in BoostLevel::ALL {
        assert!(seen.contains(&level), "boost level '{level}' is missing");
    }

    let constants = &content.constants;
    assert!(
        constants.max_strategy_stints > 0,
        "max_strategy_stints must be at least 1"
    );
    assert!(
        constants.base_lap_time_s > 0.0,
        "base_lap_time_s must be positive"
    );
    assert!(
        constants.pit_stop_time_s >= 0.0,
        "pit_stop_time_s must not be negative"
    );
}

/// Keys circuits by code, panicking on a duplicate.
fn index_circuits(circuits: Vec<Circuit>) -> BTreeMap<CircuitCode, Circuit> {
    let mut indexed = BTreeMap::new();
    for circuit in circuits {
        let code = circuit.code.clone();
        let previous = indexed.insert(code.clone(), circuit);
        assert!(previous.is_none(), "circuit '{code}' is defined twice");
    }
    indexed
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let raw = std::fs::read_to_string(dir.join(file)).with_context(|| format!("reading {file}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {file}"))
}

pub fn load_content(content_dir: &str) -> Result<PlannerContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = read_json(dir, "constants.json")?;
    let circuits_file: CircuitsFile = read_json(dir, "circuits.json")?;
    let boost_file: BoostLevelsFile = read_json(dir, "boost_levels.json")?;

    let content = PlannerContent {
        content_version: circuits_file.content_version,
        circuits: index_circuits(circuits_file.circuits),
        boost_levels: boost_file.levels,
        constants,
    };
    validate_content(&content);
    tracing::info!(
        content_dir,
        version = %content.content_version,
        circuits = content.circuits.len(),
        "content loaded"
    );
    Ok(content)
}
