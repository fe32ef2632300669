//! Ordering the input by x-coordinate.
//!
//! This is the first step of tour construction. The table fill assumes
//! vertex `i` never lies to the right of vertex `i + 1`.

use crate::types::TourVertex;

/// Copy `points` into a new vector sorted by ascending x-coordinate.
///
/// The input is not modified. Points with equal x are ordered by
/// [`TourVertex::tie_break`], so every permutation of the same points
/// sorts to the same sequence and yields the same tour. NaN placement
/// follows [`f64::total_cmp`].
#[must_use = "returns the sorted copy"]
pub fn sort_by_x<P: TourVertex>(points: &[P]) -> Vec<P> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x_coord()
            .total_cmp(&b.x_coord())
            .then_with(|| a.tie_break(b))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Point3};

    #[test]
    fn empty_input_returns_empty() {
        let sorted = sort_by_x::<Point>(&[]);
        assert!(sorted.is_empty());
    }

    #[test]
    fn sorts_ascending_by_x() {
        let input = [
            Point::new(3.0, 0.0),
            Point::new(-1.0, 5.0),
            Point::new(2.0, 2.0),
        ];
        let sorted = sort_by_x(&input);
        let xs: Vec<f64> = sorted.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn input_is_untouched() {
        let input = vec![Point::new(2.0, 0.0), Point::new(1.0, 0.0)];
        let before = input.clone();
        let _ = sort_by_x(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn x_takes_precedence_over_y() {
        let input = [Point::new(1.0, -9.0), Point::new(0.0, 9.0)];
        let sorted = sort_by_x(&input);
        assert_eq!(sorted, vec![Point::new(0.0, 9.0), Point::new(1.0, -9.0)]);
    }

    #[test]
    fn equal_x_orders_by_y() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(1.0, -1.0);
        let c = Point::new(1.0, 0.5);
        assert_eq!(sort_by_x(&[a, b, c]), vec![b, c, a]);
        assert_eq!(sort_by_x(&[c, a, b]), vec![b, c, a]);
    }

    #[test]
    fn equal_x_and_y_order_by_z() {
        let low = Point3::new(0.0, 1.0, -3.0);
        let high = Point3::new(0.0, 1.0, 3.0);
        assert_eq!(sort_by_x(&[high, low]), vec![low, high]);
    }

    #[test]
    fn positive_nan_sorts_last() {
        let input = [Point::new(f64::NAN, 0.0), Point::new(1.0, 0.0)];
        let sorted = sort_by_x(&input);
        assert_eq!(sorted[0], Point::new(1.0, 0.0));
        assert!(sorted[1].x.is_nan());
    }
}
