use crate::cli::layout_source;
use crate::console::render_occupancy;
use clap::Args;
use parkade::config::{parse_spot_counts, AppConfig};
use parkade::error::AppError;
use parkade::facility::{Lot, SpotCounts};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct LayoutArgs {
    /// Level layout CSV (level,handicap,compact,large,motorcycle)
    #[arg(long)]
    pub(crate) layout: Option<PathBuf>,
    /// Comma-separated level ids
    #[arg(long)]
    pub(crate) levels: Option<String>,
    /// Spots per level as handicap,compact,large,motorcycle
    #[arg(long, value_parser = parse_spot_counts)]
    pub(crate) spots: Option<SpotCounts>,
    /// Print the layout as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_layout(config: &AppConfig, args: LayoutArgs) -> Result<(), AppError> {
    let LayoutArgs {
        layout,
        levels,
        spots,
        json,
    } = args;

    let layout = layout_source(&config.layout, layout, levels, spots)?.resolve()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("Layout with {} spots", layout.capacity());
    render_occupancy(&Lot::new(&layout).occupancy());
    Ok(())
}
