//! Annealing configuration.

use crate::error::{Result, TspError};

/// Configuration for the annealing search.
///
/// Temperature decays geometrically, `T ← T · (1 − cooling_rate)`, once per
/// iteration. The loop keeps going while the temperature is above
/// `temperature_floor` **or** fewer than `min_iterations` iterations have run,
/// so whichever bound is looser decides the run length.
///
/// # Examples
///
/// ```
/// use u_tsp_anneal::sa::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_start_temperature(500.0)
///     .with_cooling_rate(0.005)
///     .with_min_iterations(2_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Initial temperature. Zero turns the search into pure descent.
    pub start_temperature: f64,

    /// Fraction of the temperature removed each iteration, in (0, 1).
    pub cooling_rate: f64,

    /// Iterations always executed, regardless of temperature.
    pub min_iterations: usize,

    /// Temperature at or below which worse proposals are never accepted.
    pub temperature_floor: f64,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            start_temperature: 10_000.0,
            cooling_rate: 0.001,
            min_iterations: 10_000,
            temperature_floor: 1e-4,
            max_iterations: 0,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_start_temperature(mut self, t: f64) -> Self {
        self.start_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_iterations(mut self, n: usize) -> Self {
        self.min_iterations = n;
        self
    }

    pub fn with_temperature_floor(mut self, t: f64) -> Self {
        self.temperature_floor = t;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Iterations the OR-termination rule yields with no cancellation.
    ///
    /// # Errors
    /// Returns [`TspError::InvalidConfig`] if the configuration fails
    /// [`validate`](Self::validate).
    pub fn expected_iterations(&self) -> Result<usize> {
        self.validate()?;
        let mut temperature = self.start_temperature;
        let mut cooling = 0usize;
        while temperature > self.temperature_floor {
            temperature *= 1.0 - self.cooling_rate;
            cooling += 1;
        }
        let natural = cooling.max(self.min_iterations);
        Ok(if self.max_iterations > 0 {
            natural.min(self.max_iterations)
        } else {
            natural
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.start_temperature.is_finite() || self.start_temperature < 0.0 {
            return Err(TspError::invalid_config(format!(
                "start_temperature must be finite and non-negative, got {}",
                self.start_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(TspError::invalid_config(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if 1.0 - self.cooling_rate >= 1.0 {
            return Err(TspError::invalid_config(format!(
                "cooling_rate {} is too small to lower the temperature",
                self.cooling_rate
            )));
        }
        if self.min_iterations == 0 {
            return Err(TspError::invalid_config("min_iterations must be positive"));
        }
        if !self.temperature_floor.is_finite() || self.temperature_floor <= 0.0 {
            return Err(TspError::invalid_config(format!(
                "temperature_floor must be finite and positive, got {}",
                self.temperature_floor
            )));
        }
        Ok(())
    }
}
