//! Planar points and the Euclidean metric.

use std::fmt;
use std::str::FromStr;

use crate::error::TspError;

/// A city location in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `"X Y"`: exactly two whitespace-separated finite numbers.
impl FromStr for Point {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(TspError::ParsePoint(format!(
                "expected two coordinates 'X Y', got {s:?}"
            )));
        };

        let parse = |field: &str| -> Result<f64, TspError> {
            match field.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(v) => Err(TspError::ParsePoint(format!("non-finite coordinate {v}"))),
                Err(e) => Err(TspError::ParsePoint(format!("{field:?}: {e}"))),
            }
        };

        Ok(Point::new(parse(x)?, parse(y)?))
    }
}

/// Euclidean distance `sqrt((ax - bx)^2 + (ay - by)^2)`.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
