use crate::runner::SweepRow;
use serde::Serialize;

/// Rows without a recommended strategy yield `None` and are left out of that metric.
type Extractor = (&'static str, Box<dyn Fn(&SweepRow) -> Option<f64>>);

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub point_count: usize,
    pub no_strategy_count: usize,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub samples: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

pub fn compute_summary(rows: &[SweepRow]) -> SummaryStats {
    let no_strategy_count = rows.iter().filter(|r| r.recommended.is_none()).count();

    let extractors: Vec<Extractor> = vec![
        ("race_fuel", Box::new(|r| Some(r.race_fuel))),
        ("candidates", Box::new(|r| Some(r.candidates as f64))),
        ("score", Box::new(|r| r.score.map(f64::from))),
        ("estimated_time_s", Box::new(|r| r.estimated_time_s)),
        ("risk_level", Box::new(|r| r.risk_level.map(f64::from))),
        ("pit_stops", Box::new(|r| r.pit_stops.map(f64::from))),
    ];

    let metrics = extractors
        .iter()
        .filter_map(|(name, extract)| {
            let values: Vec<f64> = rows.iter().filter_map(extract).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    SummaryStats {
        point_count: rows.len(),
        no_strategy_count,
        metrics,
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    Some(MetricSummary {
        name: name.to_string(),
        samples: values.len(),
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    })
}

pub fn print_summary(scenario_name: &str, circuit_count: usize, stats: &SummaryStats) {
    println!(
        "\n=== {} ({} circuits, {} setups) ===\n",
        scenario_name, circuit_count, stats.point_count
    );
    println!(
        "{:<20} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Samples", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(73));
    for metric in &stats.metrics {
        println!(
            "{:<20} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            metric.name, metric.samples, metric.mean, metric.min, metric.max, metric.stddev
        );
    }
    println!(
        "{:<20} {}/{}",
        "no_strategy", stats.no_strategy_count, stats.point_count
    );
}
