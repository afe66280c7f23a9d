use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use strat_core::PlannerContent;
use uuid::Uuid;

mod overrides;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "strat_bench",
    about = "Batch strategy sweeps across circuits and car setups"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across its grid of circuits and setups.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

/// Scenario circuits in file order, or every circuit when none are listed.
fn resolve_circuits(content: &PlannerContent, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(content.iter_circuits().map(|c| c.code.0.clone()).collect());
    }
    let unknown: Vec<&str> = requested
        .iter()
        .filter(|code| content.get_circuit(code).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("scenario lists unknown circuits: {}", unknown.join(", "));
    }
    Ok(requested.to_vec())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let mut file =
        std::fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    file.sync_all()?;
    std::fs::rename(&tmp, path).with_context(|| format!("renaming to {}", path.display()))?;
    Ok(())
}

fn run(scenario_path: &str, output_dir: &str) -> Result<()> {
    let scenario = scenario::load_scenario(Path::new(scenario_path))?;
    let tyre_points = scenario.tyre_points.expand();
    let fuel_points = scenario.fuel_points.expand();

    let mut content = strat_world::load_content(&scenario.content_dir)?;
    overrides::apply_overrides(&mut content.constants, &scenario.overrides)?;
    strat_world::validate_content(&content);

    let circuits = resolve_circuits(&content, &scenario.circuits)?;
    let points = runner::sweep_points(&circuits, &tyre_points, &fuel_points);
    println!(
        "Loading scenario '{}': {} circuits × {} tyre × {} fuel = {} setups",
        scenario.name,
        circuits.len(),
        tyre_points.len(),
        fuel_points.len(),
        points.len()
    );

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;
    println!("Output: {}", run_dir.display());

    let results: Vec<Result<runner::SweepRow>> = points
        .par_iter()
        .map(|point| runner::run_point(&content, point, &scenario.constraints))
        .collect();

    let mut rows = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => eprintln!("Setup failed: {err:#}"),
        }
    }
    if rows.is_empty() {
        bail!("all setups failed");
    }

    let csv_path = run_dir.join("sweep.csv");
    runner::write_rows_csv(&csv_path, &rows)?;

    let stats = summary::compute_summary(&rows);
    summary::print_summary(&scenario.name, circuits.len(), &stats);

    let summary_path = run_dir.join("summary.json");
    let summary_json = serde_json::to_string_pretty(&stats).context("serializing summary")?;
    std::fs::write(&summary_path, summary_json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let batch_summary = serde_json::json!({
        "batch_schema_version": 1,
        "batch_id": Uuid::new_v4().to_string(),
        "git_sha": env!("GIT_SHA"),
        "git_dirty": env!("GIT_DIRTY") == "true",
        "content_version": content.content_version,
        "scenario_name": scenario.name,
        "scenario_params": {
            "circuits": circuits,
            "tyre_points": tyre_points,
            "fuel_points": fuel_points,
            "constraints": scenario.constraints,
            "content_dir": scenario.content_dir,
            "overrides": scenario.overrides,
        },
        "point_count": stats.point_count,
        "failed_count": points.len() - rows.len(),
        "no_strategy_count": stats.no_strategy_count,
    });
    let batch_path = run_dir.join("batch_summary.json");
    let batch_json =
        serde_json::to_string_pretty(&batch_summary).context("serializing batch summary")?;
    write_atomic(&batch_path, &batch_json)?;

    println!("Sweep written to {}", csv_path.display());
    println!("Summary written to {}", summary_path.display());
    println!("Batch summary written to {}", batch_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => run(&scenario, &output_dir)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strat_core::test_fixtures::base_content;

    #[test]
    fn test_resolve_circuits_defaults_to_all() {
        let content = base_content();
        let circuits = resolve_circuits(&content, &[]).unwrap();
        assert_eq!(circuits, vec!["france", "italy", "monaco"]);
    }

    #[test]
    fn test_resolve_circuits_keeps_requested_order() {
        let content = base_content();
        let requested = vec!["monaco".to_string(), "france".to_string()];
        assert_eq!(resolve_circuits(&content, &requested).unwrap(), requested);
    }

    #[test]
    fn test_resolve_circuits_rejects_unknown() {
        let content = base_content();
        let requested = vec!["monaco".to_string(), "atlantis".to_string()];
        let err = resolve_circuits(&content, &requested).unwrap_err();
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn test_write_atomic_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch_summary.json");
        write_atomic(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
