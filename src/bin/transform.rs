//! Catalog transform tool.
//!
//! Downloads or opens a star catalog, remaps every record's position
//! from the source extent into the target extent, and writes the result
//! as comma-separated `x,y,magnitude` lines.
//!
//! # Usage
//!
//! ```bash
//! starcat-transform http://tdc-www.harvard.edu/catalogs/bsc5.dat stars.csv
//! starcat-transform catalog.txt stars.csv --target-x 0 500 --target-y 0 500
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use starcat::catalog::{Encoding, RecordFields, Star, StarReader};
use starcat::coords::{CoordinateSystem, LinearCoordinateSystemTransform, TransformError};

/// Download star data from a URL or file, transform, and write to an
/// output file.
#[derive(Parser)]
#[command(name = "starcat-transform", version)]
#[command(about = "Download star data, transform coordinates, and write to an output file")]
struct Cli {
    /// Catalog to read: an http(s) URL or a local file path
    input: String,

    /// Output file for the transformed x,y,magnitude lines
    output: PathBuf,

    /// Source extent along x
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true,
          default_values_t = [-1.0, 1.0])]
    source_x: Vec<f64>,

    /// Source extent along y
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true,
          default_values_t = [-1.0, 1.0])]
    source_y: Vec<f64>,

    /// Target extent along x
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true,
          default_values_t = [0.0, 1000.0])]
    target_x: Vec<f64>,

    /// Target extent along y
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true,
          default_values_t = [0.0, 1000.0])]
    target_y: Vec<f64>,

    /// Text encoding of the catalog
    #[arg(long, default_value = "utf-8")]
    encoding: Encoding,
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

    let source = CoordinateSystem::new(pair(&cli.source_x), pair(&cli.source_y));
    let target = CoordinateSystem::new(pair(&cli.target_x), pair(&cli.target_y));
    let transform = LinearCoordinateSystemTransform::new(&source, &target);

    info!(input = %cli.input, "reading catalog");
    let reader = StarReader::with_encoding(open_input(&cli.input)?, cli.encoding);
    let stars: Vec<Star> = reader
        .read_with(
            |(x, y, z, magnitude): RecordFields| -> Result<RecordFields, TransformError> {
                let (x, y) = transform.transform((x, y))?;
                Ok((x, y, z, magnitude))
            },
        )
        .collect::<Result<_, _>>()
        .context("catalog could not be transformed")?;

    let output = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut output = BufWriter::new(output);
    for star in &stars {
        writeln!(
            output,
            "{},{},{}",
            star.coordinates.0, star.coordinates.1, star.magnitude
        )?;
    }
    output.flush()?;

    info!(count = stars.len(), output = %cli.output.display(), "wrote transformed catalog");
    Ok(())
}

fn pair(values: &[f64]) -> (f64, f64) {
    (values[0], values[1])
}

/// Open the record source: http(s) URLs are fetched with ureq, anything
/// else is treated as a local path.
fn open_input(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if input.starts_with("http://") || input.starts_with("https://") {
        let response = ureq::get(input)
            .call()
            .with_context(|| format!("failed to fetch {input}"))?;
        Ok(Box::new(BufReader::new(response.into_body().into_reader())))
    } else {
        let file = File::open(input).with_context(|| format!("failed to open {input}"))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
