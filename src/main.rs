//! Sprint Sim - Entry Point
//!
//! Loads a sprint plan (or the bundled demo), validates it, runs the tick
//! loop, and writes optional HTML and JSON reports.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sprint_sim::core::error::Result;
use sprint_sim::sprint::{HtmlReport, SimulationOutput, SprintPlan, StrategyKind};

const DEMO_PLAN: &str = include_str!("../data/demo_sprint.toml");

/// Simulate a software delivery sprint tick by tick
#[derive(Parser, Debug)]
#[command(name = "sprint-sim")]
#[command(about = "Simulate a software delivery sprint with greedy work assignment")]
struct Args {
    /// Sprint plan in TOML; the bundled demo plan is used when omitted
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Override the plan's day limit
    #[arg(long)]
    max_days: Option<u32>,

    /// Override the plan's assignment strategy (first-match, least-remaining)
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Run without pre-flight validation
    #[arg(long)]
    no_validate: bool,

    /// Write an HTML report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the full history and statistics as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log every assignment and stage transition
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_directive = if args.verbose {
        "sprint_sim=debug"
    } else {
        "sprint_sim=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_planning_error() => {
            eprintln!("Sprint plan rejected: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut plan = match &args.plan {
        Some(path) => SprintPlan::load(path)?,
        None => SprintPlan::parse_toml(DEMO_PLAN)?,
    };

    if let Some(max_days) = args.max_days {
        plan.max_days = max_days;
    }
    if let Some(strategy) = args.strategy {
        plan.strategy = strategy;
    }
    if args.no_validate {
        plan.validate = false;
    }

    let mut simulator = plan.simulator()?;
    if plan.validate {
        simulator.validate()?;
    }

    println!("=== SPRINT SIM ===");
    println!("Team size: {}", simulator.workers().len());
    println!("Features: {}", simulator.features().len());
    println!("Max days: {}", plan.max_days);
    println!("Strategy: {}", simulator.strategy_name());
    println!();

    for warning in simulator.warnings() {
        println!("Warning: {}", warning);
    }

    let start = Instant::now();
    let outcome = simulator.run(plan.max_days)?;
    let elapsed = start.elapsed();

    let output = SimulationOutput::new(simulator, outcome, elapsed);
    println!("{}", output.summary());

    if let Some(path) = &args.report {
        HtmlReport::new(&output.history).save(path)?;
        println!("Report written to {}", path.display());
    }

    if let Some(path) = &args.json {
        std::fs::write(path, output.to_json()?)?;
        println!("JSON written to {}", path.display());
    }

    Ok(())
}
