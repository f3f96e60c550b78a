//! Problem instances: random generation and coordinate-list parsing.

use rand::Rng;

use crate::error::{Result, TspError};
use crate::geometry::Point;

/// Number of cities generated when the caller supplies none.
pub const DEFAULT_CITY_COUNT: usize = 20;

/// Side of the square box random cities are drawn from.
pub const DEFAULT_EXTENT: f64 = 200.0;

/// Draws `count` cities uniformly from `[0, extent)²`, rounded to whole
/// coordinates.
///
/// # Errors
/// [`TspError::InvalidInput`] if `count` is zero or `extent` is not a
/// positive finite number.
pub fn random_instance<R: Rng>(count: usize, extent: f64, rng: &mut R) -> Result<Vec<Point>> {
    if count == 0 {
        return Err(TspError::invalid_input("city count must be positive"));
    }
    if !extent.is_finite() || extent <= 0.0 {
        return Err(TspError::invalid_input(format!(
            "extent must be positive and finite, got {extent}"
        )));
    }

    Ok((0..count)
        .map(|_| {
            Point::new(
                rng.random_range(0.0..extent).round(),
                rng.random_range(0.0..extent).round(),
            )
        })
        .collect())
}

/// Parses one `X Y` pair per line. Blank lines are skipped.
///
/// # Errors
/// [`TspError::ParsePoint`] naming the first offending line (1-based).
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::instance::parse_points;
///
/// let points = parse_points("0 0\n\n3 4\n").unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[1].distance_to(&points[0]), 5.0);
/// ```
pub fn parse_points(text: &str) -> Result<Vec<Point>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse::<Point>().map_err(|e| match e {
                TspError::ParsePoint(msg) => TspError::ParsePoint(format!("line {}: {msg}", i + 1)),
                other => other,
            })
        })
        .collect()
}
