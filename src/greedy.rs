//! Nearest-neighbor tour construction.
//!
//! Produces the starting tour for the annealer: begin at a city, walk to the
//! closest city not yet visited, repeat until every city is on the tour.
//! O(n²) distance evaluations, run once per search.

use crate::error::{Result, TspError};
use crate::geometry::{distance, Point};
use crate::tour::Tour;

/// Builds greedy nearest-neighbor tours.
pub struct GreedyConstructor;

impl GreedyConstructor {
    /// Builds a tour starting from the first input point.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `points` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp_anneal::geometry::Point;
    /// use u_tsp_anneal::greedy::GreedyConstructor;
    ///
    /// let points = vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 10.0),
    ///     Point::new(0.0, 10.0),
    ///     Point::new(10.0, 0.0),
    /// ];
    /// let tour = GreedyConstructor::build(&points).unwrap();
    /// assert!((tour.length() - 40.0).abs() < 1e-9);
    /// ```
    pub fn build(points: &[Point]) -> Result<Tour> {
        Self::build_from(points, 0)
    }

    /// Builds a tour starting from `points[start]`.
    ///
    /// Ties between equidistant candidates go to the lowest input index, so
    /// the result depends only on the input order.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `points` is empty or `start` is out of
    /// range.
    pub fn build_from(points: &[Point], start: usize) -> Result<Tour> {
        if points.is_empty() {
            return Err(TspError::invalid_input("cannot build a tour from zero points"));
        }
        if start >= points.len() {
            return Err(TspError::invalid_input(format!(
                "start index {start} out of range for {} points",
                points.len()
            )));
        }

        let n = points.len();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);

        let mut current = start;
        visited[current] = true;
        order.push(points[current]);

        while order.len() < n {
            let mut nearest: Option<(usize, f64)> = None;
            for (i, &candidate) in points.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let d = distance(points[current], candidate);
                // Strict comparison keeps the first index on ties.
                if nearest.is_none_or(|(_, best)| d < best) {
                    nearest = Some((i, d));
                }
            }

            // At least one unvisited city remains while order.len() < n.
            let Some((next, _)) = nearest else { break };
            visited[next] = true;
            order.push(points[next]);
            current = next;
        }

        Ok(Tour::new(order))
    }
}
