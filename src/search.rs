//! Uniform entry points over the three drivers.
//!
//! [`Strategy`] is a tagged set of search strategies sharing the same
//! tour/move primitives, so callers can pick a driver at runtime and run
//! restarts without caring which one it is. The free functions mirror the
//! plain `(problem, tour, parameters)` call shape.

use rand::Rng;
use tracing::{debug, info};

use crate::error::{Result, TspError};
use crate::hill_climb::{HillClimbConfig, HillClimbRunner};
use crate::problem::Problem;
use crate::sa::{SaConfig, SaRunner};
use crate::tabu::{TabuConfig, TabuRunner};
use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A local-search driver together with its configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Steepest-descent hill climbing.
    HillClimb(HillClimbConfig),
    /// Simulated annealing. Randomness comes from the generator passed to
    /// [`Strategy::solve`]; `seed` in the config is ignored.
    Annealing(SaConfig),
    /// Tabu search.
    Tabu(TabuConfig),
}

/// Final tour and cost of one strategy run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchOutcome {
    /// Final tour of the run.
    pub tour: Tour,
    /// Cost of the final tour.
    pub cost: f64,
    /// The driver's own cost history.
    pub cost_history: Vec<f64>,
}

impl Strategy {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::HillClimb(_) => "hill_climb",
            Strategy::Annealing(_) => "annealing",
            Strategy::Tabu(_) => "tabu",
        }
    }

    /// Runs the strategy once from `tour`.
    pub fn solve<R: Rng>(&self, problem: &Problem, tour: Tour, rng: &mut R) -> Result<SearchOutcome> {
        let outcome = match self {
            Strategy::HillClimb(config) => {
                let r = HillClimbRunner::run(problem, tour, config)?;
                SearchOutcome {
                    tour: r.tour,
                    cost: r.cost,
                    cost_history: r.cost_history,
                }
            }
            Strategy::Annealing(config) => {
                let r = SaRunner::run_with_rng(problem, tour, config, rng, None)?;
                SearchOutcome {
                    tour: r.tour,
                    cost: r.cost,
                    cost_history: r.cost_history,
                }
            }
            Strategy::Tabu(config) => {
                let r = TabuRunner::run(problem, tour, config)?;
                SearchOutcome {
                    tour: r.tour,
                    cost: r.cost,
                    cost_history: r.cost_history,
                }
            }
        };
        Ok(outcome)
    }

    /// Runs the strategy from `starts` random tours and keeps the cheapest
    /// outcome. The problem is shared by reference across all runs.
    pub fn solve_multi_start<R: Rng>(
        &self,
        problem: &Problem,
        starts: usize,
        rng: &mut R,
    ) -> Result<SearchOutcome> {
        if starts == 0 {
            return Err(TspError::InvalidParameter(
                "multi-start needs at least one start".into(),
            ));
        }

        let mut best: Option<SearchOutcome> = None;
        for start in 0..starts {
            let tour = Tour::random(problem.size(), rng);
            let outcome = self.solve(problem, tour, rng)?;
            debug!(strategy = self.name(), start, cost = outcome.cost, "restart finished");
            if best.as_ref().is_none_or(|b| outcome.cost < b.cost) {
                best = Some(outcome);
            }
        }

        let best = best.ok_or_else(|| TspError::InvalidParameter("no start completed".into()))?;
        info!(strategy = self.name(), starts, cost = best.cost, "multi-start finished");
        Ok(best)
    }
}

/// Steepest-descent hill climbing capped at `max_iter` improving moves.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::{hill_climb, Problem, Tour};
///
/// let problem = Problem::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let (tour, cost) = hill_climb(&problem, Tour::new(vec![1, 2, 4, 3]).unwrap(), 100).unwrap();
/// assert!(tour.is_valid());
/// assert!((cost - 4.0).abs() < 1e-9);
/// ```
pub fn hill_climb(problem: &Problem, tour: Tour, max_iter: usize) -> Result<(Tour, f64)> {
    let config = HillClimbConfig::default().with_max_iterations(max_iter);
    let result = HillClimbRunner::run(problem, tour, &config)?;
    Ok((result.tour, result.cost))
}

/// Simulated annealing with geometric cooling from `t_max` down to `t_min`,
/// `k_t` proposals per level. Returns the last accepted tour.
pub fn simulated_anneal<R: Rng>(
    problem: &Problem,
    tour: Tour,
    t_max: f64,
    t_min: f64,
    r: f64,
    k_t: usize,
    rng: &mut R,
) -> Result<(Tour, f64)> {
    let config = SaConfig::default()
        .with_initial_temperature(t_max)
        .with_min_temperature(t_min)
        .with_cooling_ratio(r)
        .with_iterations_per_temperature(k_t);
    let result = SaRunner::run_with_rng(problem, tour, &config, rng, None)?;
    Ok((result.tour, result.cost))
}

/// Tabu search with horizon `ntabu` for `niter` iterations. Returns the final
/// tour, its cost and the cost after every iteration.
pub fn tabu_search(
    problem: &Problem,
    tour: Tour,
    ntabu: usize,
    niter: usize,
) -> Result<(Tour, f64, Vec<f64>)> {
    let config = TabuConfig::default()
        .with_tabu_tenure(ntabu)
        .with_max_iterations(niter);
    let result = TabuRunner::run(problem, tour, &config)?;
    Ok((result.tour, result.cost, result.cost_history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_square() -> Problem {
        Problem::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap()
    }

    fn random_problem(n: usize, seed: u64) -> Problem {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        Problem::from_points(&points).unwrap()
    }

    #[test]
    fn test_hill_climb_unit_square() {
        let problem = unit_square();
        for cities in [vec![1, 2, 3, 4], vec![1, 2, 4, 3], vec![1, 3, 2, 4]] {
            let (tour, cost) = hill_climb(&problem, Tour::new(cities).unwrap(), 100).unwrap();
            assert!((cost - 4.0).abs() < 1e-9);
            assert!((tour.full_cost(&problem).unwrap() - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_simulated_anneal_entry_point() {
        let problem = random_problem(15, 50);
        let mut rng = StdRng::seed_from_u64(1);
        let (tour, cost) =
            simulated_anneal(&problem, Tour::identity(15), 10.0, 0.01, 0.9, 100, &mut rng)
                .unwrap();
        assert!(tour.is_valid());
        assert!((tour.full_cost(&problem).unwrap() - cost).abs() < 1e-6);
    }

    #[test]
    fn test_simulated_anneal_rejects_bad_parameters() {
        let problem = unit_square();
        let mut rng = StdRng::seed_from_u64(1);
        let err = simulated_anneal(&problem, Tour::identity(4), 1.0, 2.0, 0.9, 10, &mut rng)
            .unwrap_err();
        assert!(matches!(err, TspError::InvalidParameter(_)));
    }

    #[test]
    fn test_tabu_search_entry_point() {
        let problem = random_problem(12, 51);
        let (tour, cost, trace) = tabu_search(&problem, Tour::identity(12), 3, 40).unwrap();
        assert_eq!(trace.len(), 40);
        assert_eq!(trace.last().copied(), Some(cost));
        assert!(tour.is_valid());
    }

    #[test]
    fn test_tabu_search_unbounded_tenure() {
        let problem = random_problem(5, 53);
        let (tour, cost, trace) = tabu_search(&problem, Tour::identity(5), usize::MAX, 5).unwrap();
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.last().copied(), Some(cost));
        assert!(tour.is_valid());
    }

    #[test]
    fn test_tabu_search_rejects_zero_tenure() {
        let problem = unit_square();
        assert!(tabu_search(&problem, Tour::identity(4), 0, 10).is_err());
    }

    #[test]
    fn test_strategies_share_problem() {
        let problem = random_problem(20, 52);
        let strategies = [
            Strategy::HillClimb(HillClimbConfig::default()),
            Strategy::Annealing(SaConfig::default().with_iterations_per_temperature(50)),
            Strategy::Tabu(TabuConfig::default().with_max_iterations(100)),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let start = Tour::random(20, &mut rng);
        let initial = start.full_cost(&problem).unwrap();

        for strategy in &strategies {
            let outcome = strategy.solve(&problem, start.clone(), &mut rng).unwrap();
            assert!(outcome.tour.is_valid(), "{} broke the tour", strategy.name());
            assert!(
                outcome.cost < initial,
                "{} did not improve: {} vs {initial}",
                strategy.name(),
                outcome.cost
            );
        }
    }

    #[test]
    fn test_multi_start_keeps_cheapest() {
        let problem = random_problem(15, 53);
        let strategy = Strategy::HillClimb(HillClimbConfig::default());

        let mut rng = StdRng::seed_from_u64(9);
        let best = strategy.solve_multi_start(&problem, 5, &mut rng).unwrap();

        // Replay the same starts to compare against each outcome.
        let mut replay = StdRng::seed_from_u64(9);
        for _ in 0..5 {
            let tour = Tour::random(15, &mut replay);
            let outcome = strategy.solve(&problem, tour, &mut replay).unwrap();
            assert!(best.cost <= outcome.cost + 1e-12);
        }
    }

    #[test]
    fn test_multi_start_zero_starts() {
        let problem = unit_square();
        let mut rng = StdRng::seed_from_u64(0);
        let strategy = Strategy::Tabu(TabuConfig::default());
        assert!(matches!(
            strategy.solve_multi_start(&problem, 0, &mut rng),
            Err(TspError::InvalidParameter(_))
        ));
    }
}
