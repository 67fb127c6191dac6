//! Hill climbing execution loop.
//!
//! # Algorithm
//!
//! 1. Evaluate every candidate move on the current tour
//! 2. Pick the most negative delta (first in scan order on ties)
//! 3. If it does not improve, stop: the tour is a local optimum
//! 4. Otherwise apply it and repeat, up to the iteration cap

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::HillClimbConfig;
use crate::error::Result;
use crate::neighborhood::Candidate;
use crate::problem::Problem;
use crate::tour::{Tour, TourState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative improvement threshold: a move must lower the tracked cost by
/// more than `IMPROVEMENT_EPS * cost`, smaller deltas count as rounding noise.
const IMPROVEMENT_EPS: f64 = 1e-12;

/// Why a hill climb stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// No move improves the tour.
    LocalOptimum,
    /// `max_iterations` moves were applied.
    IterationLimit,
    /// The cancel flag was raised.
    Cancelled,
}

/// Result of a hill climbing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HillClimbResult {
    /// Final tour.
    pub tour: Tour,

    /// Cost of the final tour.
    pub cost: f64,

    /// Number of improving moves applied.
    pub iterations: usize,

    /// Why the search stopped.
    pub termination: Termination,

    /// Cost before the first move and after every move. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Executes steepest-descent hill climbing.
pub struct HillClimbRunner;

impl HillClimbRunner {
    /// Runs hill climbing from `tour`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_metaheur::hill_climb::{HillClimbConfig, HillClimbRunner, Termination};
    /// use tsp_metaheur::{Problem, Tour};
    ///
    /// let problem = Problem::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
    /// let tour = Tour::new(vec![1, 3, 2, 4]).unwrap();
    /// let result = HillClimbRunner::run(&problem, tour, &HillClimbConfig::default()).unwrap();
    /// assert!((result.cost - 4.0).abs() < 1e-9);
    /// assert_eq!(result.termination, Termination::LocalOptimum);
    /// ```
    pub fn run(problem: &Problem, tour: Tour, config: &HillClimbConfig) -> Result<HillClimbResult> {
        Self::run_with_cancel(problem, tour, config, None)
    }

    /// Runs hill climbing with an optional cancellation flag, checked
    /// between iterations.
    pub fn run_with_cancel(
        problem: &Problem,
        tour: Tour,
        config: &HillClimbConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<HillClimbResult> {
        let mut state = TourState::new(problem, tour)?;
        debug!(
            n = problem.size(),
            cost = state.cost(),
            neighborhood = ?config.neighborhood,
            "hill climbing started"
        );

        let mut cost_history = vec![state.cost()];
        let mut iterations = 0usize;

        let termination = loop {
            if iterations >= config.max_iterations {
                break Termination::IterationLimit;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break Termination::Cancelled;
                }
            }

            let best = config
                .neighborhood
                .candidates(&state)
                .fold(None, |best: Option<Candidate>, c| match best {
                    Some(b) if b.delta <= c.delta => Some(b),
                    _ => Some(c),
                });

            let threshold = -IMPROVEMENT_EPS * state.cost();
            match best {
                Some(c) if c.delta < threshold => {
                    state.apply(c.mv)?;
                }
                _ => break Termination::LocalOptimum,
            }

            iterations += 1;
            state.verify_every(iterations, config.verify_interval)?;
            cost_history.push(state.cost());
            trace!(iteration = iterations, cost = state.cost(), "hill climbing step");
        };

        let (tour, cost) = state.into_parts();
        debug!(iterations, cost, ?termination, "hill climbing finished");

        Ok(HillClimbResult {
            tour,
            cost,
            iterations,
            termination,
            cost_history,
        })
    }
}
