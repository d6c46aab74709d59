//! Plot-file parsing and star rasterization.
//!
//! The plotting tool consumes the comma-separated `x,y,magnitude` files
//! written by `starcat-transform` and rasterizes one filled square per
//! star onto an RGB canvas. Squares are either a single pixel (plain
//! mode) or sized inversely with magnitude, so brighter stars render
//! larger.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use log::debug;

use crate::catalog::Star;

/// Default margin, in pixels, between the canvas border and the plotted
/// extent.
pub const DEFAULT_MARGIN: u32 = 20;

/// Square size used in plain mode.
pub const DEFAULT_SIZE: u32 = 1;

/// Default marker color.
pub const DEFAULT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Marker sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMode {
    /// Every star is a single pixel.
    #[default]
    Plain,
    /// Square size follows `round(10 / (magnitude + 2))`.
    Magnitude,
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotMode::Plain => write!(f, "plain"),
            PlotMode::Magnitude => write!(f, "magnitude"),
        }
    }
}

impl FromStr for PlotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(PlotMode::Plain),
            "magnitude" => Ok(PlotMode::Magnitude),
            other => Err(format!(
                "unknown plot mode {other:?} (expected plain or magnitude)"
            )),
        }
    }
}

/// Error type for plot-file handling.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// The plot data file could not be read.
    #[error("failed to read plot data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A line was not a parseable `x,y,magnitude` triple.
    #[error("malformed plot record at line {line}: {record:?}")]
    MalformedRecord { line: usize, record: String },
}

/// Parse one comma-separated `x,y,magnitude` line into a star whose z
/// coordinate is fixed to zero. Fields past the third are ignored.
pub fn parse_plot_line(line: &str) -> Option<Star> {
    let mut segments = line.split(',');
    let x = segments.next()?.trim().parse().ok()?;
    let y = segments.next()?.trim().parse().ok()?;
    let magnitude = segments.next()?.trim().parse().ok()?;
    Some(Star::new((x, y, 0.0), magnitude))
}

/// Load a `x,y,magnitude` plot file produced by the transform tool.
///
/// Blank lines are skipped; anything else that fails to parse is an
/// error naming the offending line.
pub fn read_plot_file(path: &Path) -> Result<Vec<Star>, PlotError> {
    let file = File::open(path).map_err(|source| PlotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut stars = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| PlotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let star = parse_plot_line(&line).ok_or_else(|| PlotError::MalformedRecord {
            line: index + 1,
            record: line.clone(),
        })?;
        stars.push(star);
    }

    debug!("loaded {} stars from {}", stars.len(), path.display());
    Ok(stars)
}

/// Marker size in pixels for a star under the given mode.
///
/// Magnitude mode keeps the original sizing curve: very faint stars
/// round down to zero pixels and are simply not drawn, and magnitudes at
/// or below -2 (where the curve blows up or turns negative) also draw
/// nothing.
pub fn star_size(mode: PlotMode, star: &Star) -> u32 {
    match mode {
        PlotMode::Plain => DEFAULT_SIZE,
        PlotMode::Magnitude => {
            let size = (10.0 / (star.magnitude + 2.0)).round();
            if size.is_finite() && size > 0.0 {
                size as u32
            } else {
                0
            }
        }
    }
}

/// Draw one filled square onto the canvas, clipped to its bounds.
///
/// The square's top-left corner is the star's position offset by the
/// margin; positions landing outside the canvas are silently skipped.
pub fn draw_star(canvas: &mut RgbImage, star: &Star, margin: u32, size: u32, color: Rgb<u8>) {
    let x0 = star.coordinates.0 as i64 + i64::from(margin);
    let y0 = star.coordinates.1 as i64 + i64::from(margin);

    for dy in 0..i64::from(size) {
        for dx in 0..i64::from(size) {
            let (px, py) = (x0 + dx, y0 + dy);
            if px < 0 || py < 0 {
                continue;
            }
            let (px, py) = (px as u32, py as u32);
            if px < canvas.width() && py < canvas.height() {
                canvas.put_pixel(px, py, color);
            }
        }
    }
}

/// Rasterize stars onto a fresh black canvas.
pub fn render(stars: &[Star], width: u32, height: u32, margin: u32, mode: PlotMode) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for star in stars {
        let size = star_size(mode, star);
        draw_star(&mut canvas, star, margin, size, DEFAULT_COLOR);
    }
    canvas
}
