//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from the supplied tour with an empty tabu record
//! 2. At each iteration `t`:
//!    a. Evaluate every move whose two endpoints are not tabu
//!    b. Apply the lowest-delta one, even if it worsens the tour
//!    c. Forbid both endpoints until iteration `t + tabu_tenure`
//!    d. Record the cost and update the best tour seen
//! 3. If every move is tabu, fall back to the best move overall
//! 4. Terminate after `max_iterations` iterations

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::TabuConfig;
use super::types::TabuList;
use crate::error::Result;
use crate::neighborhood::Candidate;
use crate::problem::Problem;
use crate::tour::{Move, Tour, TourState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabuResult {
    /// Tour after the last iteration.
    pub tour: Tour,
    /// Cost of the final tour.
    pub cost: f64,
    /// Cheapest tour seen, including the starting one.
    pub best_tour: Tour,
    /// Cost of the cheapest tour seen.
    pub best_cost: f64,
    /// Iteration at which the best tour was found (0 = the starting tour).
    pub best_iteration: usize,
    /// Total iterations executed.
    pub iterations: usize,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Move applied at each iteration.
    pub moves: Vec<Move>,
    /// Iterations in which no move was admissible and tabu status was ignored.
    pub fallback_iterations: Vec<usize>,
    /// Cost after every iteration.
    pub cost_history: Vec<f64>,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search from `tour`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_metaheur::tabu::{TabuConfig, TabuRunner};
    /// use tsp_metaheur::{Problem, Tour};
    ///
    /// let problem = Problem::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
    /// let config = TabuConfig::default().with_max_iterations(10).with_tabu_tenure(1);
    /// let result = TabuRunner::run(&problem, Tour::new(vec![1, 3, 2, 4]).unwrap(), &config).unwrap();
    /// assert_eq!(result.cost_history.len(), 10);
    /// assert!((result.best_cost - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(problem: &Problem, tour: Tour, config: &TabuConfig) -> Result<TabuResult> {
        Self::run_with_cancel(problem, tour, config, None)
    }

    /// Executes Tabu Search with an optional cancellation flag, checked
    /// between iterations.
    pub fn run_with_cancel(
        problem: &Problem,
        tour: Tour,
        config: &TabuConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabuResult> {
        config.validate()?;
        let mut state = TourState::new(problem, tour)?;
        let mut tabu = TabuList::new(problem.size());

        debug!(
            n = problem.size(),
            cost = state.cost(),
            tenure = config.tabu_tenure,
            iterations = config.max_iterations,
            "tabu search started"
        );

        let mut best_tour = state.tour().clone();
        let mut best_cost = state.cost();
        let mut best_iteration = 0;

        let mut moves = Vec::with_capacity(config.max_iterations);
        let mut cost_history = Vec::with_capacity(config.max_iterations);
        let mut fallback_iterations = Vec::new();
        let mut cancelled = false;

        for iteration in 1..=config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Best admissible move, and best move overall for the fallback
            let mut best_admissible: Option<Candidate> = None;
            let mut best_any: Option<Candidate> = None;

            for c in config.neighborhood.candidates(&state) {
                if best_any.is_none_or(|b| c.delta < b.delta) {
                    best_any = Some(c);
                }

                let (i, j) = c.mv.positions();
                let is_tabu = tabu.is_tabu(i, iteration) || tabu.is_tabu(j, iteration);
                let aspires = config.aspiration && state.cost() + c.delta < best_cost;
                if is_tabu && !aspires {
                    continue;
                }

                if best_admissible.is_none_or(|b| c.delta < b.delta) {
                    best_admissible = Some(c);
                }
            }

            let chosen = match (best_admissible, best_any) {
                (Some(c), _) => c,
                (None, Some(c)) => {
                    debug!(iteration, "no admissible move, ignoring tabu status");
                    fallback_iterations.push(iteration);
                    c
                }
                (None, None) => break,
            };

            state.apply(chosen.mv)?;
            let (i, j) = chosen.mv.positions();
            let until = iteration.saturating_add(config.tabu_tenure);
            tabu.forbid(i, until);
            tabu.forbid(j, until);
            state.verify_every(iteration, config.verify_interval)?;

            moves.push(chosen.mv);
            cost_history.push(state.cost());

            if state.cost() < best_cost {
                best_tour = state.tour().clone();
                best_cost = state.cost();
                best_iteration = iteration;
            }

            trace!(iteration, mv = ?chosen.mv, cost = state.cost(), "tabu step");
        }

        let (tour, cost) = state.into_parts();
        debug!(
            iterations = cost_history.len(),
            cost,
            best_cost,
            fallbacks = fallback_iterations.len(),
            "tabu search finished"
        );

        Ok(TabuResult {
            tour,
            cost,
            best_tour,
            best_cost,
            best_iteration,
            iterations: cost_history.len(),
            cancelled,
            moves,
            fallback_iterations,
            cost_history,
        })
    }
}
