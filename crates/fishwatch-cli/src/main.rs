//! # Fishwatch
//!
//! Command-line front end for the fish availability engine.
//!
//! Loads a fish catalog, computes upcoming catch windows and prints them,
//! once or on every bell.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fishwatch_common::{EarthInstant, FishId, ZoneId};
use fishwatch_core::{AvailabilityEngine, Catalog, EorzeaClock};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::CliConfig;

/// Periods listed by `--zone-weather`.
const WEATHER_PERIODS: usize = 6;

#[derive(Parser, Debug)]
#[command(author, version, about = "Predicts when fish can be caught", long_about = None)]
struct Args {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog file, overriding the configured one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Keep running and reprint on every bell.
    #[arg(long)]
    watch: bool,
    /// Turn Fish Eyes on.
    #[arg(long)]
    fish_eyes: bool,
    /// Only report this fish.
    #[arg(long)]
    fish: Option<u32>,
    /// Print upcoming weather for this zone.
    #[arg(long)]
    zone_weather: Option<u32>,
    /// Pretend the current time is this Unix timestamp (seconds).
    #[arg(long)]
    at: Option<i64>,
    /// Write the effective configuration back to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("fishwatch=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Fishwatch {}", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(CliConfig::config_path);
    let mut config = match &args.config {
        Some(path) => CliConfig::load_from(path),
        None => CliConfig::load(),
    };
    if let Some(catalog) = &args.catalog {
        config.catalog_path.clone_from(catalog);
    }
    config.fish_eyes |= args.fish_eyes;
    config.validate();

    if args.save_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        return Ok(());
    }

    run(&args, &config)
}

fn run(args: &Args, config: &CliConfig) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;
    let only = args.fish.map(FishId::new);
    if let Some(id) = only {
        if catalog.get(id).is_none() {
            bail!("{id} is not in the catalog");
        }
    }

    let mut clock = EorzeaClock::new();
    if let Some(seconds) = args.at {
        clock.travel_to(EarthInstant::from_unix_seconds(seconds));
        info!("Time travelling to {}", report::format_earth(clock.now_earth()));
    }

    let mut engine = AvailabilityEngine::new(catalog, config.scheduler.clone());
    let now = clock.now();
    engine.reset(now);
    engine.set_fish_eyes(config.fish_eyes, now);

    if let Some(zone) = args.zone_weather {
        let text = report::zone_weather_report(&mut engine, ZoneId::new(zone), now, WEATHER_PERIODS)?;
        println!("{text}");
        if !args.watch {
            return Ok(());
        }
    }

    loop {
        if let Some(event) = clock.poll() {
            let now = clock.now();
            if engine.on_bell(event, now) {
                println!("{}", report::catalog_report(&engine, now, config.report_windows, only));
            }
        }
        if !args.watch {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(config.poll_interval_ms));
    }
}
