//! Shows which recipes produce and consume a resource, with their flows.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use recipe_lp::data::load_recipes;
use recipe_lp::flow::inspect;
use recipe_lp::Solution;

#[derive(Parser)]
#[command(name = "show_flow")]
#[command(about = "Trace a resource through the recipes of a solved plan")]
struct Cli {
    /// Resource to inspect
    resource: String,

    /// Recipe data
    #[arg(short, long, default_value = "recipes.json")]
    recipes: PathBuf,

    /// Directory holding solutions.json and flow_values.json
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let recipes = load_recipes(&cli.recipes)?;
    let solution = Solution::load(&cli.dir)?;
    print!("{}", inspect(&cli.resource, &recipes, &solution)?);
    Ok(())
}
