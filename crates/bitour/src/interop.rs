//! Interoperability with the [`geo`] crate.
//!
//! `geo::Coord<f64>` and `geo::Point<f64>` can be passed straight to the
//! solver, and any tour over `Into<geo::Coord>` vertices converts to a
//! closed `geo::LineString`.

use std::cmp::Ordering;

use geo::line_measures::Distance;
use geo::{Coord, Euclidean, LineString};

use crate::types::{Point, Tour, TourVertex};

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Coord<f64>> for Point {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl TourVertex for Coord<f64> {
    fn x_coord(&self) -> f64 {
        self.x
    }

    fn euclidean_distance(&self, other: &Self) -> f64 {
        Euclidean.distance(&geo::Point::from(*self), &geo::Point::from(*other))
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.y.total_cmp(&other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl TourVertex for geo::Point<f64> {
    fn x_coord(&self) -> f64 {
        self.x()
    }

    fn euclidean_distance(&self, other: &Self) -> f64 {
        Euclidean.distance(self, other)
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.y().total_cmp(&other.y())
    }

    fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

/// Convert a tour into a closed `LineString` (the first coordinate is
/// repeated at the end).
///
/// Empty tours give an empty line string.
#[must_use]
pub fn to_line_string<P>(tour: &Tour<P>) -> LineString<f64>
where
    P: Copy + Into<Coord<f64>>,
{
    let mut coords: Vec<Coord<f64>> = tour.points().iter().map(|&p| p.into()).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::closed_length;

    fn sample() -> Vec<Point> {
        vec![
            Point::new(2.0, 5.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.5, 5.5),
        ]
    }

    #[test]
    fn point_coord_conversion() {
        let p = Point::new(1.5, -2.5);
        let c: Coord<f64> = p.into();
        assert_eq!(Point::from(c), p);
    }

    #[test]
    fn coord_distance_matches_point() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 3.0, y: 4.0 };
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-12);

        let pa = geo::Point::new(0.0, 0.0);
        let pb = geo::Point::new(3.0, 4.0);
        assert!((pa.euclidean_distance(&pb) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn coord_tour_matches_point_tour() {
        let points = sample();
        let coords: Vec<Coord<f64>> = points.iter().map(|&p| p.into()).collect();

        let from_points = crate::bitonic_tour(&points);
        let from_coords: Vec<Point> = crate::bitonic_tour(&coords)
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(from_points, from_coords);
    }

    #[test]
    fn geo_point_tour_is_a_permutation() {
        let points: Vec<geo::Point<f64>> = sample()
            .into_iter()
            .map(|p| geo::Point::new(p.x, p.y))
            .collect();
        let tour = crate::bitonic_tour(&points);
        assert_eq!(tour.len(), points.len());
        for p in &points {
            assert!(tour.contains(p));
        }
    }

    #[test]
    fn geo_types_break_x_ties_on_y() {
        let coords = [Coord { x: 1.0, y: 4.0 }, Coord { x: 1.0, y: -4.0 }];
        let sorted = crate::sort::sort_by_x(&coords);
        assert_eq!(sorted, vec![coords[1], coords[0]]);

        let points = [geo::Point::new(1.0, 4.0), geo::Point::new(1.0, -4.0)];
        assert_eq!(points[0].tie_break(&points[1]), Ordering::Greater);
    }

    #[test]
    fn line_string_is_closed_ring() {
        let tour = crate::solve(&sample());
        let ring = to_line_string(&tour);
        assert!(ring.is_closed());
        assert_eq!(ring.0.len(), tour.len() + 1);

        let ring_points: Vec<Point> = ring.0.iter().map(|&c| Point::from(c)).collect();
        let open = &ring_points[..ring_points.len() - 1];
        assert!((closed_length(open) - tour.length()).abs() < 1e-9);
    }

    #[test]
    fn empty_tour_gives_empty_line_string() {
        let tour: Tour<Point> = Tour::new(Vec::new(), 0.0);
        assert!(to_line_string(&tour).0.is_empty());
    }
}
