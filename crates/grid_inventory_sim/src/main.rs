//! Grid inventory scenario runner
//!
//! Loads a scenario TOML, runs its actions against a fresh inventory and an
//! in-memory world, then prints the final grid.
//!
//! ```text
//! grid_inventory_sim [scenario.toml]
//! RUST_LOG=debug grid_inventory_sim scenarios/demo.toml
//! ```

mod runner;
mod scenario;

use runner::{render_grid, Runner};
use scenario::Scenario;

const DEFAULT_SCENARIO: &str = "scenarios/demo.toml";

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Scenario failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SCENARIO.to_string());

    log::info!("Loading scenario from {}", path);
    let scenario = Scenario::load(&path)?;
    log::info!(
        "{} item definitions, {} actions",
        scenario.items.len(),
        scenario.actions.len()
    );

    let mut runner = Runner::new(scenario)?;
    let report = runner.run()?;

    let inventory = runner.inventory();
    println!("{}", render_grid(inventory));
    println!(
        "weight {:.2}/{:.2}  money {}  pickups {}",
        inventory.current_weight(),
        inventory.max_weight(),
        inventory.money(),
        runner.world().len()
    );
    println!(
        "{} actions succeeded, {} rejected",
        report.succeeded, report.rejected
    );
    for (name, count) in &report.events {
        log::debug!("{:>20} x{}", name, count);
    }

    Ok(())
}
