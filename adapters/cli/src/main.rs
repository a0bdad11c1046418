#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the spawn director headlessly against a
//! box level.

mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use spawn_director_geometry::{Level, SimulatedHost};
use spawn_director_system_director::{Director, DirectorConfig};
use tracing_subscriber::EnvFilter;

use crate::summary::Summary;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless driver for the spawn director", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Loads a level and simulates a number of ticks.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Level description in TOML.
    #[arg(long)]
    level: PathBuf,

    /// Director configuration in TOML; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    dt_ms: u64,

    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Retires simulated actors after this many ticks.
    #[arg(long)]
    actor_lifetime_ticks: Option<u64>,
}

/// Entry point for the spawn director command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(&args),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    if args.dt_ms == 0 {
        bail!("--dt-ms must be greater than zero");
    }

    let mut config = match &args.config {
        Some(path) => DirectorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DirectorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let level = Level::load(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    tracing::info!(
        solids = level.geometry.solids().len(),
        spawn_markers = level.spawn_markers.len(),
        waypoint_markers = level.waypoint_markers.len(),
        "level loaded"
    );

    let mut director =
        Director::new(&config, level.observer).context("invalid director configuration")?;
    let initialization =
        director.initialize(level.spawn_markers, level.waypoint_markers, &level.geometry);

    let mut host = match args.actor_lifetime_ticks {
        Some(ticks) => SimulatedHost::with_lifetime(ticks),
        None => SimulatedHost::new(),
    };

    let mut summary = Summary::new(&initialization);
    let dt = Duration::from_millis(args.dt_ms);
    for _ in 0..args.ticks {
        let _ = host.advance();
        let report = director.tick(dt, &level.geometry, &mut host);
        summary.record(&report);
    }
    summary.finish(&host);

    print!("{summary}");
    Ok(())
}
