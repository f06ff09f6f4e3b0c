use crate::demo::{run_demo, DemoArgs};
use crate::layout::{run_layout, LayoutArgs};
use clap::{Parser, Subcommand};
use parkade::config::{
    parse_levels, parse_spot_counts, AppConfig, LayoutSource, DEFAULT_LEVELS, DEFAULT_SPOTS,
};
use parkade::error::AppError;
use parkade::facility::SpotCounts;
use parkade::telemetry;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Parkade",
    about = "Simulate spot allocation and fees for a multi-level parking lot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Park and release a few vehicles and narrate what happens (default command)
    Demo(DemoArgs),
    /// Show the capacity of the configured layout
    Layout(LayoutArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(
        ?config.environment,
        layout = ?config.layout,
        fees = ?config.fees,
        "configuration loaded"
    );

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(&config, args),
        Command::Layout(args) => run_layout(&config, args),
    }
}

/// Applies command-line overrides on top of the configured layout source.
pub(crate) fn layout_source(
    configured: &LayoutSource,
    csv: Option<PathBuf>,
    levels: Option<String>,
    spots: Option<SpotCounts>,
) -> Result<LayoutSource, AppError> {
    if let Some(path) = csv {
        return Ok(LayoutSource::Csv(path));
    }
    if levels.is_none() && spots.is_none() {
        return Ok(configured.clone());
    }

    let (default_levels, default_counts) = match configured {
        LayoutSource::Uniform { levels, counts } => (levels.clone(), *counts),
        LayoutSource::Csv(_) => (
            parse_levels(DEFAULT_LEVELS)?,
            parse_spot_counts(DEFAULT_SPOTS)?,
        ),
    };
    let levels = match levels {
        Some(raw) => parse_levels(&raw)?,
        None => default_levels,
    };

    Ok(LayoutSource::Uniform {
        levels,
        counts: spots.unwrap_or(default_counts),
    })
}
