//! Annealing execution loop.

use super::config::AnnealConfig;
use super::types::{acceptance_probability, AnnealResult, AnnealStep};
use crate::error::Result;
use crate::tour::Tour;
use log::{debug, info, warn};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use u_numflow::random::create_rng;

/// A single annealing run, driven one iteration at a time.
///
/// Each call to [`Iterator::next`] performs one swap proposal, the Metropolis
/// decision, the best-tour update and one cooling step, then yields an
/// [`AnnealStep`]. The sequence is finite and cannot be restarted; once it
/// returns `None`, [`AnnealSearch::finish`] hands back the result.
///
/// [`best`](AnnealSearch::best) is a complete tour at every iteration
/// boundary, so a caller may stop pulling steps at any point.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tsp_anneal::geometry::Point;
/// use u_tsp_anneal::sa::{AnnealConfig, AnnealSearch};
/// use u_tsp_anneal::tour::Tour;
///
/// let tour = Tour::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
///     Point::new(10.0, 0.0),
/// ]);
/// let config = AnnealConfig::default().with_min_iterations(500);
/// let mut search = AnnealSearch::new(tour, &config, StdRng::seed_from_u64(1)).unwrap();
/// let mut last_best = f64::INFINITY;
/// for step in search.by_ref().take(500) {
///     assert!(step.best_length <= last_best);
///     last_best = step.best_length;
/// }
/// assert_eq!(search.iterations(), 500);
/// ```
pub struct AnnealSearch<R: Rng> {
    config: AnnealConfig,
    rng: R,
    cancel: Option<Arc<AtomicBool>>,

    initial_length: f64,
    current: Tour,
    current_length: f64,
    best: Tour,
    best_length: f64,

    temperature: f64,
    iteration: usize,
    accepted_moves: usize,
    improving_moves: usize,
    cancelled: bool,
    checkpoints: [usize; 3],
}

impl<R: Rng> AnnealSearch<R> {
    /// Prepares a search starting from `initial`.
    ///
    /// # Errors
    /// Returns [`TspError::InvalidConfig`](crate::TspError::InvalidConfig) if
    /// `config` fails [`AnnealConfig::validate`].
    pub fn new(initial: Tour, config: &AnnealConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let initial_length = initial.length();

        Ok(Self {
            config: config.clone(),
            rng,
            cancel: None,
            initial_length,
            best: initial.clone(),
            best_length: initial_length,
            current: initial,
            current_length: initial_length,
            temperature: config.start_temperature,
            iteration: 0,
            accepted_moves: 0,
            improving_moves: 0,
            cancelled: false,
            checkpoints: progress_checkpoints(config.min_iterations),
        })
    }

    /// Attaches a cancellation flag, checked once before every iteration.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn initial_length(&self) -> f64 {
        self.initial_length
    }

    pub fn current(&self) -> &Tour {
        &self.current
    }

    pub fn best(&self) -> &Tour {
        &self.best
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn should_continue(&self) -> bool {
        if self.config.max_iterations > 0 && self.iteration >= self.config.max_iterations {
            return false;
        }
        self.temperature > self.config.temperature_floor
            || self.iteration < self.config.min_iterations
    }

    /// Consumes the search and packages the best tour found so far.
    ///
    /// `history` is left empty; [`AnnealRunner`] fills it while driving the
    /// steps.
    pub fn finish(self) -> AnnealResult {
        AnnealResult {
            initial_length: self.initial_length,
            best: self.best,
            best_length: self.best_length,
            history: Vec::new(),
            iterations: self.iteration,
            final_temperature: self.temperature,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            cancelled: self.cancelled,
        }
    }
}

impl<R: Rng> Iterator for AnnealSearch<R> {
    type Item = AnnealStep;

    fn next(&mut self) -> Option<AnnealStep> {
        if self.cancelled || !self.should_continue() {
            return None;
        }
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                self.cancelled = true;
                return None;
            }
        }

        let n = self.current.len();
        let current_energy = self.current_length;

        // Swap proposal; coinciding positions leave the tour unchanged.
        let mut proposal = self.current.clone();
        if n > 0 {
            let i = self.rng.random_range(0..n);
            let j = self.rng.random_range(0..n);
            proposal.swap(i, j);
        }
        let new_energy = proposal.length();

        // Metropolis acceptance criterion
        let probability = acceptance_probability(
            current_energy,
            new_energy,
            self.temperature,
            self.config.temperature_floor,
        );
        let accepted = probability > self.rng.random_range(0.0..1.0);
        if accepted {
            if new_energy < current_energy {
                self.improving_moves += 1;
            }
            self.current = proposal;
            self.current_length = new_energy;
            self.accepted_moves += 1;
        }

        if self.current_length < self.best_length {
            self.best = self.current.clone();
            self.best_length = self.current_length;
        }

        if self.checkpoints.contains(&self.iteration) {
            debug!(
                "iteration {}: current {:.3}, best {:.3}, temperature {:.4}",
                self.iteration, current_energy, self.best_length, self.temperature
            );
        }

        let step = AnnealStep {
            iteration: self.iteration,
            temperature: self.temperature,
            current_length: current_energy,
            best_length: self.best_length,
            accepted,
        };

        // Cool down
        self.temperature *= 1.0 - self.config.cooling_rate;
        self.iteration += 1;

        Some(step)
    }
}

/// Iterations at a quarter, half and three quarters of `min_iterations`,
/// rounded half-to-even.
fn progress_checkpoints(min_iterations: usize) -> [usize; 3] {
    let quarter = (min_iterations as f64 / 4.0).round_ties_even() as usize;
    let half = (min_iterations as f64 / 2.0).round_ties_even() as usize;
    [quarter, half, 3 * quarter]
}

/// Executes the annealing search.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the search from `initial`, seeding from `config.seed` (or from
    /// entropy when unset).
    pub fn run(initial: Tour, config: &AnnealConfig) -> Result<AnnealResult> {
        Self::run_with_cancel(initial, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is set, the loop stops before the next iteration and
    /// returns the best tour recorded so far.
    pub fn run_with_cancel(
        initial: Tour,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(initial, config, rng, cancel)
    }

    /// Runs the search drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng>(
        initial: Tour,
        config: &AnnealConfig,
        rng: R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        let mut search = AnnealSearch::new(initial, config, rng)?;
        if let Some(flag) = cancel {
            search = search.with_cancel(flag);
        }

        debug!(
            "annealing {} cities: initial length {:.3}, start temperature {}",
            search.current().len(),
            search.initial_length(),
            config.start_temperature
        );

        let history: Vec<f64> = search.by_ref().map(|step| step.current_length).collect();

        let mut result = search.finish();
        result.history = history;

        if result.cancelled {
            warn!(
                "annealing cancelled after {} iterations, best length {:.3}",
                result.iterations, result.best_length
            );
        }
        info!(
            "annealing finished: {:.3} -> {:.3} ({:.1}% shorter) in {} iterations",
            result.initial_length,
            result.best_length,
            result.improvement() * 100.0,
            result.iterations
        );

        Ok(result)
    }

    /// Runs one independent search per seed in parallel and returns the one
    /// with the shortest best tour.
    ///
    /// Each run owns its own state; only the finished results are compared.
    /// Returns `Ok(None)` when `seeds` is empty.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(
        initial: &Tour,
        config: &AnnealConfig,
        seeds: &[u64],
    ) -> Result<Option<AnnealResult>> {
        use rayon::prelude::*;

        config.validate()?;

        let results = seeds
            .par_iter()
            .map(|&seed| {
                let config = config.clone().with_seed(seed);
                Self::run(initial.clone(), &config)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(results
            .into_iter()
            .min_by(|a, b| a.best_length.total_cmp(&b.best_length)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::greedy::GreedyConstructor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square() -> Vec<Point> {
        vec![pt(0.0, 0.0), pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0)]
    }

    /// Twenty cities on a 200×200 grid, fixed for reproducibility.
    fn scattered() -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(2024);
        (0..20)
            .map(|_| {
                pt(
                    rng.random_range(0.0..200.0f64).round(),
                    rng.random_range(0.0..200.0f64).round(),
                )
            })
            .collect()
    }

    fn sorted(points: &[Point]) -> Vec<(f64, f64)> {
        let mut v: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn test_square_converges_to_optimum() {
        // Start from the crossed ordering so the search has work to do.
        let crossed = Tour::new(vec![pt(0.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0), pt(10.0, 0.0)]);
        let config = AnnealConfig::default().with_seed(42);

        let result = AnnealRunner::run(crossed, &config).unwrap();

        assert!(
            (result.best_length - 40.0).abs() < 1e-9,
            "expected 40, got {}",
            result.best_length
        );
        assert!(result.initial_length > 40.0);
    }

    #[test]
    fn test_greedy_square_stays_optimal() {
        let tour = GreedyConstructor::build(&square()).unwrap();
        let result = AnnealRunner::run(tour, &AnnealConfig::default().with_seed(42)).unwrap();
        assert!((result.initial_length - 40.0).abs() < 1e-9);
        assert!((result.best_length - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point() {
        let tour = GreedyConstructor::build(&[pt(5.0, 5.0)]).unwrap();
        let config = AnnealConfig::default().with_min_iterations(100).with_seed(1);
        let result = AnnealRunner::run(tour, &config).unwrap();
        assert_eq!(result.initial_length, 0.0);
        assert_eq!(result.best_length, 0.0);
        assert_eq!(result.best.points(), &[pt(5.0, 5.0)]);
    }

    #[test]
    fn test_or_termination_runs_until_cold() {
        let config = AnnealConfig::default().with_seed(3);
        let tour = GreedyConstructor::build(&square()).unwrap();
        let result = AnnealRunner::run(tour, &config).unwrap();

        assert_eq!(result.iterations, config.expected_iterations().unwrap());
        assert!(result.iterations > config.min_iterations);
        assert!(result.final_temperature <= config.temperature_floor);
        assert_eq!(result.history.len(), result.iterations);
    }

    #[test]
    fn test_or_termination_runs_min_iterations_when_cold() {
        let config = AnnealConfig::default()
            .with_start_temperature(0.0)
            .with_min_iterations(1234)
            .with_seed(3);
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let result = AnnealRunner::run(tour, &config).unwrap();
        assert_eq!(result.iterations, 1234);
        assert_eq!(result.history.len(), 1234);
    }

    #[test]
    fn test_non_decaying_cooling_rate_is_error() {
        let config = AnnealConfig::default().with_cooling_rate(1e-17).with_seed(1);
        let tour = GreedyConstructor::build(&square()).unwrap();
        assert!(matches!(
            AnnealRunner::run(tour, &config),
            Err(crate::TspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_progress_checkpoints_rounded() {
        assert_eq!(progress_checkpoints(10_000), [2500, 5000, 7500]);
        assert_eq!(progress_checkpoints(6), [2, 3, 6]);
        assert_eq!(progress_checkpoints(10), [2, 5, 6]);
        assert_eq!(progress_checkpoints(1), [0, 0, 0]);
    }

    #[test]
    fn test_max_iterations_limit() {
        let config = AnnealConfig::default().with_max_iterations(100).with_seed(42);
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let result = AnnealRunner::run(tour, &config).unwrap();
        assert_eq!(result.iterations, 100);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = AnnealConfig::default().with_cooling_rate(2.0);
        let tour = GreedyConstructor::build(&square()).unwrap();
        assert!(AnnealRunner::run(tour, &config).is_err());
    }

    #[test]
    fn test_best_never_worse_than_initial() {
        let points = scattered();
        let tour = GreedyConstructor::build(&points).unwrap();
        let greedy_length = tour.length();
        let config = AnnealConfig::default().with_seed(42);

        let result = AnnealRunner::run(tour, &config).unwrap();

        assert!((result.initial_length - greedy_length).abs() < 1e-9);
        assert!(result.best_length <= result.initial_length);
        assert!((result.best.length() - result.best_length).abs() < 1e-6);
        assert_eq!(sorted(result.best.points()), sorted(&points));
    }

    #[test]
    fn test_best_length_non_increasing_per_step() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default().with_min_iterations(3000).with_seed(9);
        let search = AnnealSearch::new(tour, &config, StdRng::seed_from_u64(9)).unwrap();

        let mut last = f64::INFINITY;
        for step in search {
            assert!(
                step.best_length <= last,
                "best length rose at iteration {}: {} > {}",
                step.iteration,
                step.best_length,
                last
            );
            last = step.best_length;
        }
    }

    #[test]
    fn test_every_tour_is_a_permutation() {
        let points = scattered();
        let tour = GreedyConstructor::build(&points).unwrap();
        let config = AnnealConfig::default().with_min_iterations(2000);
        let mut search = AnnealSearch::new(tour, &config, StdRng::seed_from_u64(5)).unwrap();

        let expected = sorted(&points);
        for _ in 0..2000 {
            assert!(search.next().is_some());
            assert_eq!(sorted(search.current().points()), expected);
            assert_eq!(sorted(search.best().points()), expected);
        }
    }

    #[test]
    fn test_zero_temperature_is_pure_descent() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default()
            .with_start_temperature(0.0)
            .with_min_iterations(5000);
        let search = AnnealSearch::new(tour, &config, StdRng::seed_from_u64(11)).unwrap();

        let steps: Vec<AnnealStep> = search.collect();
        assert_eq!(steps.len(), 5000);
        for pair in steps.windows(2) {
            // Current energy never rises when worse proposals are refused.
            assert!(pair[1].current_length <= pair[0].current_length + 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default().with_min_iterations(2000).with_seed(77);
        let a = AnnealRunner::run(tour.clone(), &config).unwrap();
        let b = AnnealRunner::run(tour, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_improves_scattered_instance() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default().with_seed(42);
        let result = AnnealRunner::run(tour, &config).unwrap();
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves >= result.improving_moves);
    }

    #[test]
    fn test_cancellation() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default().with_seed(42);

        // Set before running so cancellation is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));

        let result = AnnealRunner::run_with_cancel(tour.clone(), &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best, tour);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_cancellation_mid_run_keeps_valid_best() {
        let points = scattered();
        let tour = GreedyConstructor::build(&points).unwrap();
        let config = AnnealConfig::default();
        let cancel = Arc::new(AtomicBool::new(false));
        let mut search = AnnealSearch::new(tour, &config, StdRng::seed_from_u64(8))
            .unwrap()
            .with_cancel(Arc::clone(&cancel));

        for _ in 0..500 {
            search.next();
        }
        cancel.store(true, Ordering::Relaxed);
        assert!(search.next().is_none());
        assert!(search.is_cancelled());

        let result = search.finish();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 500);
        assert_eq!(sorted(result.best.points()), sorted(&points));
        assert!((result.best.length() - result.best_length).abs() < 1e-6);
    }

    #[test]
    fn test_empty_tour_runs_without_panicking() {
        let config = AnnealConfig::default().with_min_iterations(10).with_max_iterations(10);
        let result = AnnealRunner::run(Tour::default(), &config).unwrap();
        assert_eq!(result.iterations, 10);
        assert_eq!(result.best_length, 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_run_parallel_picks_best() {
        let tour = GreedyConstructor::build(&scattered()).unwrap();
        let config = AnnealConfig::default().with_min_iterations(2000).with_max_iterations(2000);
        let seeds = [1, 2, 3, 4];

        let best = AnnealRunner::run_parallel(&tour, &config, &seeds)
            .unwrap()
            .unwrap();

        for &seed in &seeds {
            let single = AnnealRunner::run(tour.clone(), &config.clone().with_seed(seed)).unwrap();
            assert!(best.best_length <= single.best_length + 1e-9);
        }
        assert!(AnnealRunner::run_parallel(&tour, &config, &[]).unwrap().is_none());
    }
}
