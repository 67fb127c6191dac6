//! Hill climbing configuration.

use crate::neighborhood::Neighborhood;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for steepest-descent hill climbing.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::hill_climb::HillClimbConfig;
/// use tsp_metaheur::Neighborhood;
///
/// let config = HillClimbConfig::default()
///     .with_max_iterations(500)
///     .with_neighborhood(Neighborhood::Swap);
/// assert_eq!(config.max_iterations, 500);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HillClimbConfig {
    /// Hard cap on improving moves applied.
    pub max_iterations: usize,

    /// Move primitive to search over.
    pub neighborhood: Neighborhood,

    /// Recompute the full cost every this many iterations and compare it
    /// with the tracked cost. 0 = never.
    pub verify_interval: usize,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            neighborhood: Neighborhood::Flip,
            verify_interval: 0,
        }
    }
}

impl HillClimbConfig {
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
}
