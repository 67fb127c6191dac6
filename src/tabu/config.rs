//! Tabu Search configuration.

use crate::error::{Result, TspError};
use crate::neighborhood::Neighborhood;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7)
///     .with_aspiration(true);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_tenure, 7);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabuConfig {
    /// Number of iterations to run (`niter`).
    pub max_iterations: usize,
    /// How many iterations a just-moved position stays forbidden (`ntabu`).
    pub tabu_tenure: usize,
    /// Whether a tabu move is admissible when it yields a new best cost.
    pub aspiration: bool,
    /// Move primitive to search over.
    pub neighborhood: Neighborhood,
    /// Recompute the full cost every this many iterations. 0 = never.
    pub verify_interval: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tabu_tenure: 7,
            aspiration: false,
            neighborhood: Neighborhood::Flip,
            verify_interval: 0,
        }
    }
}

impl TabuConfig {
    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure (number of iterations a position remains tabu).
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Enables or disables the aspiration criterion.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Sets the move primitive.
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Sets the cost verification interval.
    pub fn with_verify_interval(mut self, n: usize) -> Self {
        self.verify_interval = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tabu_tenure == 0 {
            return Err(TspError::InvalidParameter(
                "tabu_tenure must be positive".into(),
            ));
        }
        Ok(())
    }
}
