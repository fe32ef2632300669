//! Measurements on closed tours.

use crate::types::TourVertex;

/// Total length of the closed tour visiting `points` in order,
/// including the edge from the last point back to the first.
///
/// Zero for fewer than 2 points.
#[must_use]
pub fn closed_length<P: TourVertex>(points: &[P]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points
        .windows(2)
        .map(|pair| pair[0].euclidean_distance(&pair[1]))
        .sum();
    let closing = match (points.last(), points.first()) {
        (Some(last), Some(first)) => last.euclidean_distance(first),
        _ => 0.0,
    };
    open + closing
}

/// Returns `true` if the closed tour visiting `points` in order is
/// bitonic: starting from some minimum-x point, x never decreases until
/// a maximum-x point and never increases after it.
///
/// Any sequence of 3 or fewer points is bitonic.
#[must_use]
pub fn is_bitonic<P: TourVertex>(points: &[P]) -> bool {
    if points.len() <= 3 {
        return true;
    }
    let xs: Vec<f64> = points.iter().map(TourVertex::x_coord).collect();
    let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);

    xs.iter()
        .enumerate()
        .filter(|&(_, &x)| x <= min_x)
        .any(|(start, _)| is_unimodal_from(&xs, start))
}

/// Check that `xs`, read cyclically from `start`, rises then falls.
fn is_unimodal_from(xs: &[f64], start: usize) -> bool {
    let n = xs.len();
    let mut falling = false;
    for step in 1..n {
        let prev = xs[(start + step - 1) % n];
        let next = xs[(start + step) % n];
        if falling {
            if next > prev {
                return false;
            }
        } else if next < prev {
            falling = true;
        }
    }
    true
}
