//! Linear coordinate system transformations.
//!
//! A [`CoordinateSystem`] declares the valid numeric extent of a 2D plane
//! along each axis; [`LinearCoordinateSystemTransform`] maps points from
//! one extent into another, rejecting inputs that fall outside the source
//! extent before any arithmetic happens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rectangular coordinate plane described by its numeric extent along
/// each axis.
///
/// Ranges are kept in the order they were given; a "reversed" range flips
/// the direction of the remap but is otherwise valid. The first element
/// of `y_range` corresponds to the visual top of the plane, so the
/// default pairs a math-like x-right axis with a screen-like y-down axis.
///
/// Equal endpoints on a source range are not checked and produce
/// non-finite results when transformed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    /// Valid extent along the x axis.
    pub x_range: (f64, f64),
    /// Valid extent along the y axis, top value first.
    pub y_range: (f64, f64),
}

impl CoordinateSystem {
    /// Create a coordinate system with explicit extents.
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self { x_range, y_range }
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            x_range: (-1.0, 1.0),
            y_range: (1.0, -1.0),
        }
    }
}

/// Axis identifier used in range violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Error type for coordinate transformations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// The input point lies outside the declared source extent.
    #[error(
        "{axis} coordinate {value} is outside of the source coordinate system range ({}, {})",
        .range.0,
        .range.1
    )]
    OutOfRange {
        /// Axis on which the violation occurred.
        axis: Axis,
        /// Offending input value.
        value: f64,
        /// The violated source range, in its stored order.
        range: (f64, f64),
    },
}

/// Range-validated linear transform between two coordinate systems.
///
/// Borrows its source and target, so the same [`CoordinateSystem`] values
/// can back any number of transforms. Constructed once per session and
/// queried once per record; the operation is a pure function of the input
/// point and the two fixed extents.
#[derive(Debug, Clone, Copy)]
pub struct LinearCoordinateSystemTransform<'a> {
    source: &'a CoordinateSystem,
    target: &'a CoordinateSystem,
}

impl<'a> LinearCoordinateSystemTransform<'a> {
    pub fn new(source: &'a CoordinateSystem, target: &'a CoordinateSystem) -> Self {
        Self { source, target }
    }

    /// Map a point from the source extent into the target extent.
    ///
    /// The point is range-checked against the source extents first. A
    /// non-negative x follows the plain affine remap of the x extents,
    /// and a non-negative y is remapped through the y extents and then
    /// reflected within the target y extent. Negative inputs are remapped
    /// through the opposite axis' extents; a latent asymmetry carried
    /// over from the original catalog pipeline, kept until confirmed
    /// against real catalog data.
    pub fn transform(&self, point: (f64, f64)) -> Result<(f64, f64), TransformError> {
        self.ensure_in_range(point)?;

        let (x, y) = point;
        let target_y_max = self.target.y_range.0.max(self.target.y_range.1);

        let new_x = if x >= 0.0 {
            remap(x, self.source.x_range, self.target.x_range)
        } else {
            target_y_max - remap(-x, self.source.y_range, self.target.y_range)
        };

        let new_y = if y >= 0.0 {
            target_y_max - remap(y, self.source.y_range, self.target.y_range)
        } else {
            remap(-y, self.source.x_range, self.target.x_range)
        };

        Ok((new_x, new_y))
    }

    fn ensure_in_range(&self, (x, y): (f64, f64)) -> Result<(), TransformError> {
        let x_range = self.source.x_range;
        if x < x_range.0 || x > x_range.1 {
            return Err(TransformError::OutOfRange {
                axis: Axis::X,
                value: x,
                range: x_range,
            });
        }

        // The y extent may be stored top-first; validate against the
        // interval it spans regardless of order.
        let y_range = self.source.y_range;
        let (lo, hi) = if y_range.0 <= y_range.1 {
            (y_range.0, y_range.1)
        } else {
            (y_range.1, y_range.0)
        };
        if y < lo || y > hi {
            return Err(TransformError::OutOfRange {
                axis: Axis::Y,
                value: y,
                range: y_range,
            });
        }

        Ok(())
    }
}

/// Affine remap of a scalar from one interval onto another.
///
/// Equal source endpoints are not guarded; IEEE-754 infinities and NaN
/// propagate to the caller.
fn remap(v: f64, (s_min, s_max): (f64, f64), (t_min, t_max): (f64, f64)) -> f64 {
    ((v - s_min) / (s_max - s_min)) * (t_max - t_min) + t_min
}
