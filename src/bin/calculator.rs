//! Computes a production plan and writes `solutions.json` and `flow_values.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use recipe_lp::data::{load_recipes, load_science, load_technologies};
use recipe_lp::solution::{FLOW_FILE, SOLUTION_FILE};
use recipe_lp::{Backend, Planner, PlannerConfig};

/// How the demand file is interpreted
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Weighting {
    /// `{"science": {...}, "research_time": seconds}`, amortized over the labs
    Science,
    /// `{"technologies": {...}}` or a plain map, used as-is
    Technologies,
}

#[derive(Parser)]
#[command(name = "calculator")]
#[command(about = "Maximise science output of a recipe graph with a linear program")]
struct Cli {
    /// Recipe data
    #[arg(short, long, default_value = "recipes.json")]
    recipes: PathBuf,

    /// Demand data
    #[arg(short, long, default_value = "science.json")]
    demand: PathBuf,

    /// Format of the demand data
    #[arg(short, long, value_enum, default_value_t = Weighting::Science)]
    weighting: Weighting,

    /// Planner configuration (JSON); defaults apply to missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solver backend, overrides the configuration
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Where to write the solution artifacts
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Log debug details, and let the solver print its progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(file) => PlannerConfig::load(file)?,
        None => PlannerConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.solver = backend;
    }
    config.verbose_solver |= cli.verbose;

    let recipes = load_recipes(&cli.recipes)?;
    let weighting = match cli.weighting {
        Weighting::Science => load_science(&cli.demand)?.into_weighting(config.lab.clone()),
        Weighting::Technologies => load_technologies(&cli.demand)?.into_weighting(),
    };

    let planner = Planner::new(config)?;
    let outcome = planner
        .run_and_save(&recipes, &weighting, &cli.out_dir)
        .context("no solution was written")?;
    info!(
        "{} and {} written to {} (solved by {})",
        SOLUTION_FILE,
        FLOW_FILE,
        cli.out_dir.display(),
        outcome.solver
    );
    Ok(())
}
