//! # starcat
//!
//! Star catalog coordinate remapping toolkit.
//!
//! Ingests flat-text astronomical catalog records (position plus
//! brightness), remaps 2D positions between coordinate systems with a
//! strict, range-validated linear transform, and emits transformed
//! records for downstream consumption.
//!
//! ## Architecture
//!
//! The crate is organized into three modules:
//!
//! - [`coords`]: coordinate extents and the range-validated linear
//!   transform between them
//! - [`catalog`]: the streaming record reader with per-record transform
//!   injection
//! - [`render`]: plot-file parsing and square rasterization helpers
//!
//! Two thin binaries wrap the library: `starcat-transform` opens a
//! catalog (local file or http(s) URL), pipes every record through a
//! coordinate transform, and writes `x,y,magnitude` CSV lines;
//! `starcat-plot` renders such a file to a PNG image.
//!
//! ## Example
//!
//! ```
//! use starcat::catalog::{RecordFields, StarReader};
//! use starcat::coords::{CoordinateSystem, LinearCoordinateSystemTransform, TransformError};
//!
//! let source = CoordinateSystem::new((-1.0, 1.0), (-1.0, 1.0));
//! let target = CoordinateSystem::new((0.0, 1000.0), (0.0, 1000.0));
//! let transform = LinearCoordinateSystemTransform::new(&source, &target);
//!
//! let catalog = "0.5 0.5 0 28 4.61\n";
//! let stars: Vec<_> = StarReader::new(catalog.as_bytes())
//!     .read_with(
//!         |(x, y, z, magnitude): RecordFields| -> Result<RecordFields, TransformError> {
//!             let (x, y) = transform.transform((x, y))?;
//!             Ok((x, y, z, magnitude))
//!         },
//!     )
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(stars[0].coordinates, (750.0, 250.0, 0.0));
//! # Ok::<(), starcat::catalog::ReadError>(())
//! ```

pub mod catalog;
pub mod coords;
pub mod render;

pub use catalog::{Encoding, ReadError, Star, StarReader};
pub use coords::{CoordinateSystem, LinearCoordinateSystemTransform, TransformError};
