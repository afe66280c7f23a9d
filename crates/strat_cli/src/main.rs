use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use strat_core::{BoostLevel, Compound, PlannerContent, Strategy, StrategyConstraints};
use strat_world::load_content;
use tracing_subscriber::EnvFilter;

mod render;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "strat_cli", about = "Race tyre and fuel strategy planner")]
struct Cli {
    #[arg(long, global = true, default_value = "./content")]
    content_dir: String,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SetupArgs {
    #[arg(long, default_value_t = 100.0)]
    tyre_points: f64,
    #[arg(long, default_value_t = 100.0)]
    fuel_points: f64,
}

#[derive(Args)]
struct ConstraintArgs {
    #[arg(long, default_value_t = 3)]
    max_stints: u32,
    /// Comma-separated compound preference order.
    #[arg(long, value_delimiter = ',', default_value = "medium,soft")]
    compounds: Vec<Compound>,
    #[arg(long, default_value_t = 5)]
    min_stint: u32,
    /// Defaults to 70% of the race distance.
    #[arg(long)]
    max_stint: Option<u32>,
}

impl ConstraintArgs {
    fn constraints(&self) -> StrategyConstraints {
        StrategyConstraints {
            max_stints: self.max_stints,
            preferred_compounds: self.compounds.clone(),
            min_stint_length: self.min_stint,
            max_stint_length: self.max_stint,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the circuit catalog.
    Circuits,
    /// Tyre life after a stint.
    Tyre {
        circuit: String,
        /// Compound name; unrecognized names wear like medium.
        #[arg(long, default_value = "medium")]
        compound: String,
        #[arg(long)]
        laps: u32,
        #[arg(long, default_value_t = 100.0)]
        tyre_points: f64,
    },
    /// Fuel for the full race distance.
    RaceFuel {
        circuit: String,
        #[arg(long, default_value_t = 100.0)]
        fuel_points: f64,
    },
    /// Fuel for a stint at a boost level.
    StintFuel {
        circuit: String,
        #[arg(long)]
        laps: u32,
        #[arg(long, default_value = "neutral")]
        boost: String,
        #[arg(long, default_value_t = 100.0)]
        fuel_points: f64,
    },
    /// Base fuel for a single lap.
    LapFuel {
        circuit: String,
        #[arg(long, default_value_t = 100.0)]
        fuel_points: f64,
    },
    /// List candidate strategies without scoring them.
    Generate {
        circuit: String,
        /// Defaults to the circuit's race distance.
        #[arg(long)]
        laps: Option<u32>,
        #[command(flatten)]
        setup: SetupArgs,
        #[command(flatten)]
        constraints: ConstraintArgs,
    },
    /// Score candidates and recommend the best.
    Optimize {
        circuit: String,
        #[arg(long)]
        laps: Option<u32>,
        #[command(flatten)]
        setup: SetupArgs,
        #[command(flatten)]
        constraints: ConstraintArgs,
    },
    /// Validate a strategy file against the circuit and content limits.
    Check { strategy_file: String },
    /// Time, fuel and risk estimate for a strategy file.
    Analyze {
        strategy_file: String,
        /// Circuit to analyze on; defaults to the strategy's own circuit.
        #[arg(long)]
        circuit: Option<String>,
    },
    /// Compare several strategy files on one circuit.
    Compare {
        #[arg(long)]
        circuit: String,
        #[arg(required = true)]
        strategy_files: Vec<String>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Circuits => "circuits",
            Commands::Tyre { .. } => "tyre",
            Commands::RaceFuel { .. } => "race-fuel",
            Commands::StintFuel { .. } => "stint-fuel",
            Commands::LapFuel { .. } => "lap-fuel",
            Commands::Generate { .. } => "generate",
            Commands::Optimize { .. } => "optimize",
            Commands::Check { .. } => "check",
            Commands::Analyze { .. } => "analyze",
            Commands::Compare { .. } => "compare",
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_strategy(path: &str) -> Result<Strategy> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading strategy file: {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("parsing strategy file: {path}"))
}

fn race_laps(content: &PlannerContent, circuit: &str, laps: Option<u32>) -> Result<u32> {
    match laps {
        Some(laps) => Ok(laps),
        None => Ok(content.circuit(circuit)?.laps),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serializing output")?
    );
    Ok(())
}

/// Prints `value` as JSON when requested, otherwise with `text`.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        print_json(value)
    } else {
        text(value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn lap_fuel(content: &PlannerContent, json: bool, circuit: &str, fuel_points: f64) -> Result<()> {
    let fuel = strat_core::compute_lap_fuel(content, circuit, fuel_points)?;
    let body = serde_json::json!({
        "circuit": circuit,
        "fuel_points": fuel_points,
        "fuel_per_lap": strat_core::present::round_to(fuel, 3),
    });
    emit(json, &body, |_| {
        println!("{circuit}: {fuel:.3} fuel per lap at {fuel_points} fuel points");
    })
}

fn generate(
    content: &PlannerContent,
    json: bool,
    circuit: &str,
    laps: Option<u32>,
    setup: &SetupArgs,
    constraints: &ConstraintArgs,
) -> Result<()> {
    let laps = race_laps(content, circuit, laps)?;
    let candidates: Vec<Strategy> = strat_core::generate_strategies(
        content,
        circuit,
        laps,
        setup.tyre_points,
        setup.fuel_points,
        &constraints.constraints(),
    )
    .collect();
    emit(json, &candidates, |c| render::candidates(c))
}

fn optimize(
    content: &PlannerContent,
    json: bool,
    circuit: &str,
    laps: Option<u32>,
    setup: &SetupArgs,
    constraints: &ConstraintArgs,
) -> Result<()> {
    let laps = race_laps(content, circuit, laps)?;
    let result = strat_core::optimize_strategy(
        content,
        circuit,
        laps,
        setup.tyre_points,
        setup.fuel_points,
        &constraints.constraints(),
    )?;
    emit(json, &result, render::optimization)
}

fn analyze(
    content: &PlannerContent,
    json: bool,
    strategy_file: &str,
    circuit: Option<&str>,
) -> Result<()> {
    let strategy = read_strategy(strategy_file)?;
    let circuit = circuit.unwrap_or(&strategy.circuit.0);
    let analysis = strat_core::analyze_strategy(content, &strategy, circuit)?;
    let verdict = strat_core::pros_and_cons(&analysis);
    let body = serde_json::json!({
        "description": strategy.description(),
        "analysis": analysis,
        "pros_cons": verdict,
    });
    emit(json, &body, |_| {
        render::analysis(&strategy, &analysis, &verdict);
    })
}

fn compare(
    content: &PlannerContent,
    json: bool,
    circuit: &str,
    strategy_files: &[String],
) -> Result<()> {
    let strategies = strategy_files
        .iter()
        .map(|path| read_strategy(path))
        .collect::<Result<Vec<_>>>()?;
    let comparison = strat_core::compare_strategies(content, &strategies, circuit)?;
    emit(json, &comparison, render::comparison)
}

fn run(content: &PlannerContent, json: bool, command: &Commands) -> Result<()> {
    match command {
        Commands::Circuits => {
            let circuits: Vec<_> = content.iter_circuits().collect();
            emit(json, &circuits, |c| render::circuits(c))
        }
        Commands::Tyre {
            circuit,
            compound,
            laps,
            tyre_points,
        } => {
            let result = strat_core::compute_tyre_wear_by_name(
                content,
                circuit,
                compound,
                *laps,
                *tyre_points,
            )?;
            emit(json, &result.rounded(), render::tyre_wear)
        }
        Commands::RaceFuel {
            circuit,
            fuel_points,
        } => {
            let result = strat_core::compute_race_fuel(content, circuit, *fuel_points)?;
            emit(json, &result.rounded(), render::race_fuel)
        }
        Commands::StintFuel {
            circuit,
            laps,
            boost,
            fuel_points,
        } => {
            let level = BoostLevel::from_key(boost);
            let result =
                strat_core::compute_stint_fuel(content, circuit, *fuel_points, *laps, level)?;
            emit(json, &result.rounded(), render::stint_fuel)
        }
        Commands::LapFuel {
            circuit,
            fuel_points,
        } => lap_fuel(content, json, circuit, *fuel_points),
        Commands::Generate {
            circuit,
            laps,
            setup,
            constraints,
        } => generate(content, json, circuit, *laps, setup, constraints),
        Commands::Optimize {
            circuit,
            laps,
            setup,
            constraints,
        } => optimize(content, json, circuit, *laps, setup, constraints),
        Commands::Check { strategy_file } => {
            let strategy = read_strategy(strategy_file)?;
            let check = strategy.check(content)?;
            emit(json, &check, |c| render::check(&strategy, c))
        }
        Commands::Analyze {
            strategy_file,
            circuit,
        } => analyze(content, json, strategy_file, circuit.as_deref()),
        Commands::Compare {
            circuit,
            strategy_files,
        } => compare(content, json, circuit, strategy_files),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let content = load_content(&cli.content_dir)?;
    tracing::debug!(
        content_dir = %cli.content_dir,
        command = cli.command.name(),
        json = cli.json,
        "running command"
    );
    run(&content, cli.json, &cli.command)
}
