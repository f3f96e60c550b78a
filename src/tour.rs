//! Closed tours over a fixed set of cities.

use crate::geometry::{distance, Point};

/// An ordered visit sequence, interpreted as a closed cycle: the last point
/// connects back to the first.
///
/// `Clone` copies the point buffer, so a saved tour is never affected by
/// later edits to the tour it was cloned from.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    points: Vec<Point>,
}

impl Tour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total cycle length, including the closing edge. Zero for fewer than
    /// two points.
    pub fn length(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let open: f64 = self
            .points
            .windows(2)
            .map(|w| distance(w[0], w[1]))
            .sum();
        open + distance(self.points[n - 1], self.points[0])
    }

    /// Exchanges the cities at positions `i` and `j`. `i == j` is a no-op.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.points.swap(i, j);
    }
}

impl From<Vec<Point>> for Tour {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for Tour {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
