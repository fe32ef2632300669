//! bitour: Minimum-length bitonic tours (sans-IO).
//!
//! A bitonic tour visits every point once and can be split at its
//! leftmost and rightmost points into two chains that are each monotone
//! in x. Restricting the tour this way makes the shortest one computable
//! exactly in O(n²):
//!
//! sort by x -> fill distance and reconstruction tables -> walk the
//! reconstruction chain back into a visiting order.
//!
//! The result is optimal among bitonic tours only; it is not a general
//! traveling-salesman solution.
//!
//! This crate has **no I/O dependencies**. It works on in-memory point
//! slices and returns plain data. The `bitour-bench` crate owns file and
//! terminal access.

pub mod diagnostics;
pub mod interop;
pub mod metrics;
pub mod reconstruct;
pub mod sort;
pub mod table;
pub mod types;

pub use diagnostics::{Clock, TourDiagnostics, WebClock, solve_with_diagnostics};
pub use interop::to_line_string;
pub use metrics::{closed_length, is_bitonic};
pub use table::{Direction, MAX_TABLE_POINTS, PathNode, TourTable};
pub use types::{Point, Point3, Tour, TourConfig, TourError, TourVertex};

/// Inputs smaller than this are returned unchanged: with fewer than four
/// points there is no meaningful split into two chains.
pub const MIN_BITONIC_POINTS: usize = 4;

/// Compute the minimum-length bitonic tour through `points`.
///
/// Returns the same points reordered so that visiting them in sequence
/// and returning to the first one traces the shortest bitonic tour.
/// Inputs of fewer than [`MIN_BITONIC_POINTS`] points come back in their
/// original order.
///
/// The input is not modified. NaN or infinite coordinates produce an
/// unspecified ordering; see [`TourConfig::reject_non_finite`] for a
/// checked alternative.
///
/// # Examples
///
/// ```
/// use bitour::{Point, bitonic_tour};
///
/// let tour = bitonic_tour(&[
///     Point::new(2.0, 5.0),
///     Point::new(3.0, 1.0),
///     Point::new(1.0, 2.0),
///     Point::new(4.0, 4.0),
///     Point::new(2.5, 5.5),
/// ]);
/// assert_eq!(
///     tour,
///     vec![
///         Point::new(2.5, 5.5),
///         Point::new(2.0, 5.0),
///         Point::new(1.0, 2.0),
///         Point::new(3.0, 1.0),
///         Point::new(4.0, 4.0),
///     ]
/// );
/// ```
#[must_use = "returns the ordered tour"]
pub fn bitonic_tour<P: TourVertex>(points: &[P]) -> Vec<P> {
    solve(points).into_points()
}

/// Compute the minimum-length bitonic tour and its closed length.
///
/// Same ordering as [`bitonic_tour`]. For inputs of at least
/// [`MIN_BITONIC_POINTS`] points the length comes straight from the
/// distance table; smaller inputs report the closed length of their
/// original order.
#[must_use = "returns the computed tour"]
pub fn solve<P: TourVertex>(points: &[P]) -> Tour<P> {
    if points.len() < MIN_BITONIC_POINTS {
        return Tour::new(points.to_vec(), closed_length(points));
    }

    let sorted = sort::sort_by_x(points);
    let table = TourTable::build(&sorted);
    let ordered = reconstruct::build_path(&table, &sorted);
    Tour::new(ordered, table.optimal_length().unwrap_or(0.0))
}

/// Compute the tour after checking `points` against `config`.
///
/// # Errors
///
/// Returns [`TourError::InvalidConfig`] if the configuration is invalid,
/// [`TourError::TooManyPoints`] if the input exceeds
/// [`TourConfig::max_points`], and [`TourError::NonFinite`] if
/// [`TourConfig::reject_non_finite`] is set and a coordinate is NaN or
/// infinite.
pub fn solve_with_config<P: TourVertex>(
    points: &[P],
    config: &TourConfig,
) -> Result<Tour<P>, TourError> {
    config.validate()?;
    config.check_points(points)?;
    Ok(solve(points))
}
