//! Star plot tool.
//!
//! Reads a comma-separated `x,y,magnitude` file (as written by
//! `starcat-transform`) and renders one filled square per star into a
//! PNG image.
//!
//! # Usage
//!
//! ```bash
//! starcat-plot 1040 1040 stars.csv
//! starcat-plot 1040 1040 stars.csv --mode magnitude --output bright.png
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use starcat::render::{self, PlotMode, DEFAULT_MARGIN};

/// Render a star data file as a PNG image.
#[derive(Parser)]
#[command(name = "starcat-plot", version)]
#[command(about = "Star plot app")]
struct Cli {
    /// Canvas width in pixels
    width: u32,

    /// Canvas height in pixels
    height: u32,

    /// The star data input file (x,y,magnitude per line)
    star_data_file: PathBuf,

    /// Margin in pixels
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    margin: u32,

    /// The mode for drawing the star plot
    #[arg(long, default_value = "plain")]
    mode: PlotMode,

    /// Output image path
    #[arg(long, default_value = "stars.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let stars = render::read_plot_file(&cli.star_data_file)
        .with_context(|| format!("failed to load {}", cli.star_data_file.display()))?;
    info!(count = stars.len(), "loaded star data");

    let canvas = render::render(&stars, cli.width, cli.height, cli.margin, cli.mode);
    canvas
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(output = %cli.output.display(), "wrote star plot");
    Ok(())
}
