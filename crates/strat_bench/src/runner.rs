use anyhow::{Context, Result};
use serde::Serialize;
use strat_core::{PlannerContent, StrategyConstraints};

/// One setup to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub circuit: String,
    pub tyre_points: f64,
    pub fuel_points: f64,
}

/// One CSV row. Strategy columns are empty when no candidate fit the constraints.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub circuit: String,
    pub laps: u32,
    pub tyre_points: f64,
    pub fuel_points: f64,
    pub race_fuel: f64,
    pub candidates: usize,
    pub recommended: Option<String>,
    pub score: Option<u32>,
    pub estimated_time_s: Option<f64>,
    pub risk_level: Option<u32>,
    pub pit_stops: Option<u32>,
}

/// Cartesian product of circuits and setup points, in input order.
pub fn sweep_points(circuits: &[String], tyre: &[f64], fuel: &[f64]) -> Vec<SweepPoint> {
    circuits
        .iter()
        .flat_map(|circuit| {
            tyre.iter().flat_map(move |&tyre_points| {
                fuel.iter().map(move |&fuel_points| SweepPoint {
                    circuit: circuit.clone(),
                    tyre_points,
                    fuel_points,
                })
            })
        })
        .collect()
}

pub fn run_point(
    content: &PlannerContent,
    point: &SweepPoint,
    constraints: &StrategyConstraints,
) -> Result<SweepRow> {
    let circuit = content.circuit(&point.circuit)?;
    let context = || {
        format!(
            "{} at tyre={} fuel={}",
            point.circuit, point.tyre_points, point.fuel_points
        )
    };
    let race = strat_core::compute_race_fuel(content, &point.circuit, point.fuel_points)
        .with_context(context)?;
    let optimization = strat_core::optimize_strategy(
        content,
        &point.circuit,
        circuit.laps,
        point.tyre_points,
        point.fuel_points,
        constraints,
    )
    .with_context(context)?;

    let mut row = SweepRow {
        circuit: point.circuit.clone(),
        laps: circuit.laps,
        tyre_points: point.tyre_points,
        fuel_points: point.fuel_points,
        race_fuel: race.fuel,
        candidates: optimization.candidates_considered,
        recommended: None,
        score: None,
        estimated_time_s: None,
        risk_level: None,
        pit_stops: None,
    };
    if let Some(best) = optimization.recommended {
        let analysis = strat_core::analyze_strategy(content, &best.strategy, &point.circuit)
            .with_context(context)?;
        row.recommended = Some(best.description);
        row.score = Some(best.score);
        row.estimated_time_s = Some(analysis.estimated_time_s);
        row.risk_level = Some(analysis.risk_level);
        row.pit_stops = Some(analysis.pit_stops);
    }
    Ok(row)
}

pub fn write_rows_csv(path: &std::path::Path, rows: &[SweepRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing sweep row")?;
    }
    writer.flush().context("flushing sweep CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strat_core::test_fixtures::base_content;

    #[test]
    fn test_sweep_points_cover_product() {
        let circuits = vec!["france".to_string(), "monaco".to_string()];
        let points = sweep_points(&circuits, &[40.0, 80.0], &[100.0, 120.0, 140.0]);
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].circuit, "france");
        assert!((points[1].fuel_points - 120.0).abs() < 1e-12);
        assert_eq!(points[11].circuit, "monaco");
    }

    #[test]
    fn test_run_point_fills_strategy_columns() {
        let content = base_content();
        let point = SweepPoint {
            circuit: "france".to_string(),
            tyre_points: 49.0,
            fuel_points: 80.0,
        };
        let constraints = StrategyConstraints {
            max_stint_length: Some(16),
            ..StrategyConstraints::default()
        };
        let row = run_point(&content, &point, &constraints).unwrap();
        assert_eq!(row.laps, 24);
        assert_eq!(row.candidates, 4);
        assert_eq!(row.recommended.as_deref(), Some("S(12) → H(12)"));
        assert_eq!(row.score, Some(95));
        assert_eq!(row.pit_stops, Some(1));
    }

    #[test]
    fn test_run_point_without_candidates() {
        let content = base_content();
        let point = SweepPoint {
            circuit: "monaco".to_string(),
            tyre_points: 49.0,
            fuel_points: 80.0,
        };
        let constraints = StrategyConstraints {
            min_stint_length: 100,
            ..StrategyConstraints::default()
        };
        let row = run_point(&content, &point, &constraints).unwrap();
        assert_eq!(row.candidates, 0);
        assert!(row.recommended.is_none() && row.score.is_none());
        assert!(row.race_fuel > 0.0);
    }

    #[test]
    fn test_run_point_unknown_circuit() {
        let content = base_content();
        let point = SweepPoint {
            circuit: "atlantis".to_string(),
            tyre_points: 49.0,
            fuel_points: 80.0,
        };
        assert!(run_point(&content, &point, &StrategyConstraints::default()).is_err());
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let content = base_content();
        let rows: Vec<SweepRow> = sweep_points(&["italy".to_string()], &[50.0], &[60.0, 90.0])
            .iter()
            .map(|p| run_point(&content, p, &StrategyConstraints::default()).unwrap())
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        write_rows_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("circuit,laps,tyre_points"));
        assert_eq!(lines.count(), 2);
    }
}
