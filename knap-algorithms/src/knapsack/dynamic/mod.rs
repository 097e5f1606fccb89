use anyhow::Result;
use knap_challenges::knapsack::Challenge;
use serde_json::{Map, Value};
mod params;
mod solver;
mod table;
pub use params::Params;
pub use solver::{Optimum, Solver};
pub use table::DpTable;

pub fn solve_challenge(
    challenge: &Challenge,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Optimum> {
    let params = Params::initialize(hyperparameters);
    Ok(Solver::solve(challenge, &params, None)?)
}

pub fn help() {
    println!("Exact 0/1 knapsack by bottom-up dynamic programming");
    println!();
    println!("Hyperparameters:");
    println!("  max_table_cells (default: 268435456)");
    println!("    Largest (items + 1) x (capacity + 1) table the solver will allocate.");
    println!("    Larger instances fail before allocation.");
    println!();
    println!("  progress_interval (default: 0)");
    println!("    Number of filled rows between debug progress logs. 0 disables them.");
}
