//! Euclidean Traveling Salesman approximation.
//!
//! A tour is built greedily (nearest unvisited neighbor from the first city)
//! and then refined by simulated annealing with position-swap moves, the
//! Metropolis acceptance rule and geometric cooling.
//!
//! - [`geometry`]: points and the Euclidean metric.
//! - [`tour`]: closed tours and their length (the minimized energy).
//! - [`greedy`]: nearest-neighbor construction of the starting tour.
//! - [`sa`]: the annealing search, as a lazy step iterator and as one-shot
//!   runners.
//! - [`instance`]: random instances and `X Y` coordinate parsing.
//!
//! The crate returns plain data; reporting and plotting belong to the caller.
//! Progress is emitted through the [`log`] facade.
//!
//! # Examples
//!
//! ```
//! use u_tsp_anneal::geometry::Point;
//! use u_tsp_anneal::sa::AnnealConfig;
//!
//! let cities = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(10.0, 0.0),
//! ];
//! let result = u_tsp_anneal::solve(&cities, &AnnealConfig::default().with_seed(42)).unwrap();
//! assert!((result.best_length - 40.0).abs() < 1e-9);
//! assert!(result.best_length <= result.initial_length);
//! ```

pub mod error;
pub mod geometry;
pub mod greedy;
pub mod instance;
pub mod sa;
pub mod tour;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub use error::{Result, TspError};
pub use geometry::{distance, Point};
pub use greedy::GreedyConstructor;
pub use sa::{AnnealConfig, AnnealResult, AnnealRunner};
pub use tour::Tour;

/// Builds the greedy tour over `points` and anneals it.
///
/// # Errors
/// [`TspError::InvalidInput`] for an empty point set,
/// [`TspError::InvalidConfig`] for an invalid `config`.
pub fn solve(points: &[Point], config: &AnnealConfig) -> Result<AnnealResult> {
    solve_with_cancel(points, config, None)
}

/// [`solve`] with an optional cancellation flag for the annealing phase.
pub fn solve_with_cancel(
    points: &[Point],
    config: &AnnealConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<AnnealResult> {
    config.validate()?;
    let initial = GreedyConstructor::build(points)?;
    AnnealRunner::run_with_cancel(initial, config, cancel)
}
