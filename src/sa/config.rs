//! SA configuration.

use crate::error::{Result, TspError};
use crate::neighborhood::Neighborhood;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Simulated Annealing driver.
///
/// Cooling is geometric: after `iterations_per_temperature` proposals the
/// temperature becomes `T * cooling_ratio`. The run stops once
/// `T < min_temperature`.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_cooling_ratio(0.98)
///     .with_iterations_per_temperature(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature `Tmax`. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Stopping temperature `Tmin`, in `(0, Tmax)`.
    pub min_temperature: f64,

    /// Geometric cooling ratio `r`, in `(0, 1)`. Higher = slower cooling.
    pub cooling_ratio: f64,

    /// Number of proposals `kT` at each temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum total proposals (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Move primitive proposals are drawn from.
    pub neighborhood: Neighborhood,

    /// Recompute the full cost every this many proposals. 0 = never.
    pub verify_interval: usize,

    /// Random seed for reproducibility. Ignored by
    /// [`SaRunner::run_with_rng`](super::SaRunner::run_with_rng).
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-3,
            cooling_ratio: 0.95,
            iterations_per_temperature: 100,
            max_iterations: 0,
            neighborhood: Neighborhood::Flip,
            verify_interval: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_ratio(mut self, r: f64) -> Self {
        self.cooling_ratio = r;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_verify_interval(mut self, n: usize) -> Self {
        self.verify_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(TspError::InvalidParameter(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if self.min_temperature.is_nan() || self.min_temperature <= 0.0 {
            return Err(TspError::InvalidParameter(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(TspError::InvalidParameter(
                "min_temperature must be less than initial_temperature".into(),
            ));
        }
        if self.cooling_ratio.is_nan() || self.cooling_ratio <= 0.0 || self.cooling_ratio >= 1.0 {
            return Err(TspError::InvalidParameter(format!(
                "cooling_ratio must be in (0, 1), got {}",
                self.cooling_ratio
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(TspError::InvalidParameter(
                "iterations_per_temperature must be positive".into(),
            ));
        }
        Ok(())
    }
}
