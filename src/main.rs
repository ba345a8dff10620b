use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use parking_garage_sim::{
    config::GarageConfig,
    presentation::{ConsolePresenter, Presenter},
    simulation::SimulationDriver,
};

#[derive(Parser)]
#[command(name = "parking-garage-sim")]
#[command(about = "Concurrent parking garage simulation with collision-checked car agents")]
struct Args {
    /// Garage configuration file; the built-in reference garage is used when it is missing
    #[arg(short, long, default_value = "garage.toml")]
    config: PathBuf,

    /// Random seed for reproducible spawn intervals and dwell times
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of cars to spawn
    #[arg(short, long)]
    population: Option<u32>,

    /// Enable verbose logging of lifecycle stages
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
    info!("Starting Parking Garage Simulator");

    // Load configuration
    let mut config = if args.config.exists() {
        GarageConfig::load_from_file(&args.config)?
    } else {
        warn!("{} not found, using the reference garage", args.config.display());
        GarageConfig::reference()
    };

    if let Some(seed) = args.seed {
        config.random.seed = Some(seed);
    }
    if let Some(population) = args.population {
        anyhow::ensure!(population > 0, "Population must be greater than zero");
        config.simulation.population = population;
    }

    let presenter = Arc::new(ConsolePresenter::new());

    info!("=== Simulation Configuration ===");
    info!("Presenter: {}", presenter.get_name());
    info!("Cars: {}", config.simulation.population);
    info!("Parking spots: {}", config.layout.spots.len());
    info!(
        "Spawn interval: {:.0}-{:.0} ms, dwell: {:.0}-{:.0} ms, tick: {} ms",
        config.simulation.spawn_interval.min_ms,
        config.simulation.spawn_interval.max_ms,
        config.simulation.dwell.min_ms,
        config.simulation.dwell.max_ms,
        config.simulation.tick_ms
    );
    if let Some(seed) = config.random.seed {
        info!("Random Seed: {}", seed);
    }

    let driver = SimulationDriver::new(&config, presenter.clone());
    let report = driver.run()?;

    // Final statistics
    info!("Simulation completed!");
    info!("Total time: {:.2}s", report.elapsed.as_secs_f64());
    info!(
        "Cars: {} spawned, {} completed, {} failed",
        report.stats.spawned, report.stats.completed, report.stats.failed
    );
    info!("Door crossings: {}", report.stats.door_crossings);

    let steps: u64 = report.trips.iter().map(|t| t.movement.steps).sum();
    let blocked: u64 = report.trips.iter().map(|t| t.movement.blocked_ticks).sum();
    info!("Movement: {} steps, {} ticks spent blocked", steps, blocked);

    if presenter.live_sprites() != 0 {
        warn!("{} sprites were never released", presenter.live_sprites());
    }

    Ok(())
}
