//! Shared types for bitonic tour construction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::table::{MAX_TABLE_POINTS, PathNode};

/// A value that can be visited by a bitonic tour.
///
/// The tour is monotone in [`x_coord`](Self::x_coord) and measures edges
/// with [`euclidean_distance`](Self::euclidean_distance). Implementors
/// are plain `Copy` values; the algorithm never mutates them.
///
/// NaN or infinite coordinates make both the sort order and the cost
/// comparisons meaningless. Callers that cannot rule them out should
/// enable [`TourConfig::reject_non_finite`].
pub trait TourVertex: Copy {
    /// Coordinate the tour is monotone in.
    fn x_coord(&self) -> f64;

    /// Euclidean distance to another vertex.
    fn euclidean_distance(&self, other: &Self) -> f64;

    /// Order between two vertices with equal [`x_coord`](Self::x_coord).
    ///
    /// Must compare every remaining coordinate, so that the x sort puts
    /// any permutation of the same multiset in the same sequence.
    fn tie_break(&self, other: &Self) -> Ordering;

    /// Returns `true` if every coordinate is finite.
    fn is_finite(&self) -> bool;
}

/// A 2D point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position. Tours are monotone in this coordinate.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl TourVertex for Point {
    fn x_coord(&self) -> f64 {
        self.x
    }

    fn euclidean_distance(&self, other: &Self) -> f64 {
        self.distance(*other)
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.y.total_cmp(&other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in 3D space.
///
/// Tours over `Point3` are still split on `x` alone, but every edge is
/// measured with the full 3D distance. Use [`Point`] for strictly planar
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// First coordinate. Tours are monotone in this coordinate.
    pub x: f64,
    /// Second coordinate.
    pub y: f64,
    /// Third coordinate.
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl TourVertex for Point3 {
    fn x_coord(&self) -> f64 {
        self.x
    }

    fn euclidean_distance(&self, other: &Self) -> f64 {
        self.distance(*other)
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.z.total_cmp(&other.z))
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A closed bitonic tour.
///
/// The tour visits `points[0] -> points[1] -> ... -> points[n-1]` and
/// returns to `points[0]` along an implicit closing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour<P> {
    points: Vec<P>,
    length: f64,
}

impl<P> Tour<P> {
    /// Create a tour from an ordered point sequence and its closed length.
    #[must_use]
    pub const fn new(points: Vec<P>, length: f64) -> Self {
        Self { points, length }
    }

    /// Returns the visiting order.
    #[must_use]
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Consumes the tour and returns the visiting order.
    #[must_use]
    pub fn into_points(self) -> Vec<P> {
        self.points
    }

    /// Returns the number of points in the tour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the tour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length, including the closing edge.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }
}

impl<P: Copy> Tour<P> {
    /// The implicit edge from the last point back to the first.
    ///
    /// `None` for tours of fewer than 2 points.
    #[must_use]
    pub fn closing_edge(&self) -> Option<(P, P)> {
        if self.points.len() < 2 {
            return None;
        }
        Some((*self.points.last()?, *self.points.first()?))
    }
}

/// Configuration for the checked solver entry points.
///
/// The plain [`bitonic_tour`](crate::bitonic_tour) and
/// [`solve`](crate::solve) functions accept any input. The checked
/// variants ([`solve_with_config`](crate::solve_with_config),
/// [`solve_with_diagnostics`](crate::diagnostics::solve_with_diagnostics))
/// enforce these limits first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Largest accepted point count.
    ///
    /// Both tables hold `n * n` cells, so memory grows quadratically.
    /// See [`TourConfig::table_bytes`].
    pub max_points: usize,

    /// Whether to reject inputs containing NaN or infinite coordinates.
    ///
    /// Off by default: finiteness is the caller's responsibility and the
    /// solver does not scan the input.
    pub reject_non_finite: bool,
}

impl TourConfig {
    /// Default for [`max_points`](Self::max_points).
    pub const DEFAULT_MAX_POINTS: usize = 2048;

    /// Default for [`reject_non_finite`](Self::reject_non_finite).
    pub const DEFAULT_REJECT_NON_FINITE: bool = false;

    /// Check the configuration itself.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::InvalidConfig`] if `max_points` is zero or
    /// larger than [`MAX_TABLE_POINTS`].
    pub fn validate(&self) -> Result<(), TourError> {
        if self.max_points == 0 {
            return Err(TourError::InvalidConfig(
                "max_points must be at least 1".to_string(),
            ));
        }
        if self.max_points > MAX_TABLE_POINTS {
            return Err(TourError::InvalidConfig(format!(
                "max_points must be at most {MAX_TABLE_POINTS}, got {}",
                self.max_points
            )));
        }
        Ok(())
    }

    /// Check an input point set against this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::TooManyPoints`] if the input is larger than
    /// `max_points`, or [`TourError::NonFinite`] for the first
    /// non-finite point when `reject_non_finite` is set.
    pub fn check_points<P: TourVertex>(&self, points: &[P]) -> Result<(), TourError> {
        if points.len() > self.max_points {
            return Err(TourError::TooManyPoints {
                count: points.len(),
                limit: self.max_points,
            });
        }
        if self.reject_non_finite
            && let Some(index) = points.iter().position(|p| !p.is_finite())
        {
            return Err(TourError::NonFinite { index });
        }
        Ok(())
    }

    /// Approximate bytes held by the distance and reconstruction tables
    /// for `n` points. Saturates instead of overflowing.
    #[must_use]
    pub const fn table_bytes(n: usize) -> usize {
        let cell = size_of::<f64>() + size_of::<PathNode>();
        n.saturating_mul(n).saturating_mul(cell)
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            max_points: Self::DEFAULT_MAX_POINTS,
            reject_non_finite: Self::DEFAULT_REJECT_NON_FINITE,
        }
    }
}

/// Errors reported by the checked solver entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TourError {
    /// The input has more points than the configuration allows.
    #[error("input has {count} points, more than the limit of {limit}")]
    TooManyPoints {
        /// Number of input points.
        count: usize,
        /// Configured `max_points`.
        limit: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending point in the input.
        index: usize,
    },

    /// The configuration is invalid.
    #[error("invalid tour configuration: {0}")]
    InvalidConfig(String),
}
