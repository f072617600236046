//! Grid simulator entry point: CLI wiring and config-driven engine construction.

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid_sim::cli::Cli;
use grid_sim::config::GridConfig;
use grid_sim::io::{export_csv, read_world_csv};
use grid_sim::sim::{Engine, Summary};
use grid_sim::world::{SyntheticYear, TimeSeries};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads the grid configuration: `--config` takes priority, then `--preset`, then baseline.
fn load_config(cli: &Cli) -> Result<GridConfig> {
    let mut config = match (&cli.config, &cli.preset) {
        (Some(path), _) => GridConfig::from_toml_file(path)?,
        (None, Some(name)) => GridConfig::from_preset(name)?,
        (None, None) => GridConfig::baseline(),
    };
    if let Some(multiplier) = cli.load_multiplier {
        config.consumption.load_multiplier = multiplier;
    }
    Ok(config)
}

fn load_world(cli: &Cli) -> Result<TimeSeries> {
    match &cli.world {
        Some(path) => read_world_csv(path, cli.year)
            .with_context(|| format!("failed to load world file \"{}\"", path.display())),
        None => Ok(SyntheticYear::default().generate(cli.hours, cli.seed)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let world = load_world(&cli)?;
    info!(source = %cli.config_source(), hours = world.len(), "loaded grid and world");

    let mut engine = Engine::from_config(&config, world)?;

    let start = Instant::now();
    let results = engine.run();
    let elapsed = start.elapsed();

    let summary = Summary::from_records(&results);
    println!("{summary}");
    println!("\nCalculation time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        shortage_mwh = summary.shortage_mwh,
        dump_mwh = summary.dump_mwh,
        "run complete"
    );

    if let Some(path) = &cli.output {
        export_csv(&results, path)
            .with_context(|| format!("failed to write CSV \"{}\"", path.display()))?;
        info!(path = %path.display(), "hourly results written");
    }

    Ok(())
}
