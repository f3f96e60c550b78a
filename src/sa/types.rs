//! Acceptance criterion and the data the annealer hands back.

use crate::tour::Tour;

/// Metropolis acceptance probability for moving from `current` to
/// `proposed` energy at `temperature`.
///
/// - `proposed <= current`: exactly 1.
/// - `temperature <= floor`: 0; worse proposals are never accepted once the
///   system is frozen, and the division below is never evaluated near zero.
/// - otherwise `exp(-(proposed - current) / temperature)`.
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::sa::acceptance_probability;
///
/// assert_eq!(acceptance_probability(10.0, 9.0, 1.0, 1e-4), 1.0);
/// assert_eq!(acceptance_probability(10.0, 10.0, 1.0, 1e-4), 1.0);
/// assert_eq!(acceptance_probability(10.0, 11.0, 0.0, 1e-4), 0.0);
/// let p = acceptance_probability(10.0, 11.0, 1.0, 1e-4);
/// assert!((p - (-1.0f64).exp()).abs() < 1e-12);
/// ```
#[inline]
pub fn acceptance_probability(current: f64, proposed: f64, temperature: f64, floor: f64) -> f64 {
    let delta = proposed - current;
    if delta <= 0.0 {
        1.0
    } else if temperature <= floor {
        0.0
    } else {
        (-delta / temperature).exp()
    }
}

/// Snapshot emitted after each iteration of an
/// [`AnnealSearch`](super::AnnealSearch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealStep {
    /// Zero-based index of the iteration that produced this step.
    pub iteration: usize,

    /// Temperature the acceptance decision was made at (before cooling).
    pub temperature: f64,

    /// Energy of the current tour the proposal was compared against.
    pub current_length: f64,

    /// Best length known once this iteration finished.
    pub best_length: f64,

    /// Whether the proposal replaced the current tour.
    pub accepted: bool,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Length of the tour the search started from.
    pub initial_length: f64,

    /// The best tour found.
    pub best: Tour,

    /// Length of the best tour.
    pub best_length: f64,

    /// Current energy at every iteration, in order.
    pub history: Vec<f64>,

    /// Total number of iterations executed.
    pub iterations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Number of accepted proposals (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving proposals.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,
}

impl AnnealResult {
    /// Relative decrease from the initial length, in [0, 1].
    ///
    /// Zero when the initial tour already had zero length.
    pub fn improvement(&self) -> f64 {
        if self.initial_length > 0.0 {
            (self.initial_length - self.best_length) / self.initial_length
        } else {
            0.0
        }
    }
}
