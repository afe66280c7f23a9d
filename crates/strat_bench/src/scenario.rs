use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use strat_core::StrategyConstraints;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Circuit codes to sweep; empty means every circuit in the content.
    #[serde(default)]
    pub circuits: Vec<String>,
    pub tyre_points: PointSpec,
    pub fuel_points: PointSpec,
    #[serde(default)]
    pub constraints: StrategyConstraints,
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
    #[serde(default)]
    pub overrides: HashMap<String, serde_json::Value>,
}

/// Upper bound on values a single point spec may expand to.
const MAX_POINTS_PER_AXIS: usize = 10_000;

fn default_content_dir() -> String {
    "./content".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PointSpec {
    List(Vec<f64>),
    /// Inclusive range walked in `step` increments.
    Range { range: [f64; 2], step: f64 },
}

impl PointSpec {
    /// Number of values `expand` yields; saturates for unbounded ranges.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn len(&self) -> usize {
        match self {
            PointSpec::List(points) => points.len(),
            PointSpec::Range { range, step } => {
                let [start, end] = *range;
                if step.is_nan() || *step <= 0.0 || end.is_nan() || start.is_nan() || end < start {
                    return 0;
                }
                // Tolerate float drift so the end point is included.
                let steps = ((end - start) / step + 1e-9).floor();
                (steps as usize).saturating_add(1)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn expand(&self) -> Vec<f64> {
        match self {
            PointSpec::List(points) => points.clone(),
            PointSpec::Range { range, step } => {
                let start = range[0];
                (0..self.len()).map(|i| start + step * i as f64).collect()
            }
        }
    }
}

fn check_points(field: &str, spec: &PointSpec) -> Result<()> {
    if spec.is_empty() {
        bail!("scenario '{field}' must produce at least one value");
    }
    if spec.len() > MAX_POINTS_PER_AXIS {
        bail!(
            "scenario '{field}' expands to {} values, more than {MAX_POINTS_PER_AXIS}",
            spec.len()
        );
    }
    let points = spec.expand();
    if let Some(bad) = points.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        bail!("scenario '{field}' values must be positive, got {bad}");
    }
    Ok(())
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    check_points("tyre_points", &scenario.tyre_points)?;
    check_points("fuel_points", &scenario.fuel_points)?;
    if scenario.constraints.max_stints == 0 {
        bail!("scenario 'constraints.max_stints' must be > 0");
    }
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_scenario(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_scenario_with_point_lists() {
        let file = write_temp_scenario(
            r#"{
            "name": "lists",
            "tyre_points": [40, 80],
            "fuel_points": [100]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.name, "lists");
        assert!(scenario.circuits.is_empty());
        assert_eq!(scenario.tyre_points.expand(), vec![40.0, 80.0]);
        assert_eq!(scenario.content_dir, "./content");
        assert_eq!(scenario.constraints, StrategyConstraints::default());
        assert!(scenario.overrides.is_empty());
    }

    #[test]
    fn test_range_includes_end_point() {
        let spec = PointSpec::Range {
            range: [20.0, 30.0],
            step: 2.5,
        };
        let points = spec.expand();
        assert_eq!(points.len(), 5);
        assert!((points[4] - 30.0).abs() < 1e-9);

        let drift = PointSpec::Range {
            range: [0.1, 0.3],
            step: 0.1,
        };
        assert_eq!(drift.expand().len(), 3);
    }

    #[test]
    fn test_load_scenario_with_range_and_constraints() {
        let file = write_temp_scenario(
            r#"{
            "name": "range_test",
            "circuits": ["monaco"],
            "tyre_points": {"range": [10, 50], "step": 10},
            "fuel_points": [60],
            "constraints": {"max_stints": 4, "preferred_compounds": ["hard", "medium"]}
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.tyre_points.expand().len(), 5);
        assert_eq!(scenario.constraints.max_stints, 4);
        assert_eq!(scenario.constraints.min_stint_length, 5);
    }

    #[test]
    fn test_load_scenario_empty_name_fails() {
        let file = write_temp_scenario(
            r#"{ "name": "", "tyre_points": [1], "fuel_points": [1] }"#,
        );
        let result = load_scenario(file.path());
        assert!(result.unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_load_scenario_non_positive_points_fail() {
        let file = write_temp_scenario(
            r#"{ "name": "bad", "tyre_points": [50, 0], "fuel_points": [1] }"#,
        );
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("tyre_points"));
    }

    #[test]
    fn test_load_scenario_oversized_range_fails() {
        let file = write_temp_scenario(
            r#"{ "name": "dense", "tyre_points": {"range": [1, 200], "step": 1e-12}, "fuel_points": [1] }"#,
        );
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("more than 10000"));

        let infinite = PointSpec::Range {
            range: [1.0, f64::INFINITY],
            step: 1.0,
        };
        assert_eq!(infinite.len(), usize::MAX);
    }

    #[test]
    fn test_load_scenario_empty_range_fails() {
        let file = write_temp_scenario(
            r#"{ "name": "bad", "tyre_points": [50], "fuel_points": {"range": [90, 10], "step": 5} }"#,
        );
        assert!(load_scenario(file.path()).is_err());
    }
}
