//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::config::SaConfig;
use crate::error::Result;
use crate::problem::Problem;
use crate::tour::{Tour, TourState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaResult {
    /// The last accepted tour.
    pub tour: Tour,

    /// Cost of the last accepted tour.
    pub cost: f64,

    /// Total number of proposals.
    pub iterations: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted strictly improving moves.
    pub improving_moves: usize,

    /// Number of accepted strictly worsening moves.
    pub worsening_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Current cost at the start and after each temperature level.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with a generator seeded from `config.seed` (or from the
    /// thread-local generator when unset).
    pub fn run(problem: &Problem, tour: Tour, config: &SaConfig) -> Result<SaResult> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(problem, tour, config, &mut rng, None)
    }

    /// Runs SA drawing every random decision from `rng`, with an optional
    /// cancellation flag checked at each temperature level.
    pub fn run_with_rng<R: Rng>(
        problem: &Problem,
        tour: Tour,
        config: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult> {
        config.validate()?;
        let mut state = TourState::new(problem, tour)?;
        let n = problem.size();

        debug!(
            n,
            cost = state.cost(),
            t_max = config.initial_temperature,
            t_min = config.min_temperature,
            r = config.cooling_ratio,
            k_t = config.iterations_per_temperature,
            "simulated annealing started"
        );

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut worsening_moves = 0usize;
        let mut cancelled = false;
        let mut cost_history = vec![state.cost()];

        let budget_spent =
            |total: usize| config.max_iterations > 0 && total >= config.max_iterations;

        while temperature >= config.min_temperature {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            for _ in 0..config.iterations_per_temperature {
                if budget_spent(total_iterations) {
                    break;
                }

                let mv = config.neighborhood.sample(n, rng);
                let delta = state.delta(mv)?;

                // Metropolis acceptance criterion
                let accept = if delta <= 0.0 {
                    true
                } else {
                    let probability = (-delta / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                };

                if accept {
                    state.apply(mv)?;
                    accepted_moves += 1;
                    if delta < 0.0 {
                        improving_moves += 1;
                    } else if delta > 0.0 {
                        worsening_moves += 1;
                    }
                }

                total_iterations += 1;
                state.verify_every(total_iterations, config.verify_interval)?;
            }

            cost_history.push(state.cost());
            trace!(temperature, cost = state.cost(), "temperature level finished");

            if budget_spent(total_iterations) {
                break;
            }

            temperature *= config.cooling_ratio;
        }

        let (tour, cost) = state.into_parts();
        debug!(
            iterations = total_iterations,
            accepted_moves,
            final_temperature = temperature,
            cost,
            cancelled,
            "simulated annealing finished"
        );

        Ok(SaResult {
            tour,
            cost,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            worsening_moves,
            cancelled,
            cost_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TspError;
    use crate::hill_climb::{HillClimbConfig, HillClimbRunner};
    use crate::neighborhood::Neighborhood;

    fn random_instance(n: usize, seed: u64) -> (Problem, Tour) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let tour = Tour::random(n, &mut rng);
        (Problem::from_points(&points).unwrap(), tour)
    }

    #[test]
    fn test_sa_improves_random_tour() {
        let (problem, tour) = random_instance(30, 11);
        let initial = tour.full_cost(&problem).unwrap();
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.01)
            .with_cooling_ratio(0.95)
            .with_iterations_per_temperature(500)
            .with_seed(42);

        let result = SaRunner::run(&problem, tour, &config).unwrap();

        assert!(
            result.cost < 0.5 * initial,
            "expected a much shorter tour: {} vs initial {initial}",
            result.cost
        );
        assert!(result.improving_moves > 0);
        assert!(result.tour.is_valid());
        assert!((result.tour.full_cost(&problem).unwrap() - result.cost).abs() < 1e-6);
    }

    #[test]
    fn test_sa_level_count() {
        // 10, 5, 2.5, 1.25 are >= 1; 0.625 stops the run.
        let (problem, tour) = random_instance(8, 12);
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(1.0)
            .with_cooling_ratio(0.5)
            .with_iterations_per_temperature(7)
            .with_seed(1);

        let result = SaRunner::run(&problem, tour, &config).unwrap();

        assert_eq!(result.iterations, 28);
        assert_eq!(result.cost_history.len(), 5);
        assert!((result.final_temperature - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_sa_returns_last_accepted_state() {
        // Start from a local optimum and walk away from it at a temperature
        // high enough to accept almost every move.
        let (problem, tour) = random_instance(30, 13);
        let start = HillClimbRunner::run(&problem, tour, &HillClimbConfig::default())
            .unwrap()
            .tour;
        let config = SaConfig::default()
            .with_initial_temperature(1e6)
            .with_min_temperature(5e5)
            .with_cooling_ratio(0.5)
            .with_iterations_per_temperature(500);

        let mut rng = StdRng::seed_from_u64(3);
        let result =
            SaRunner::run_with_rng(&problem, start.clone(), &config, &mut rng, None).unwrap();

        // Replay the same draws to find the cheapest state ever accepted.
        let mut replay_rng = StdRng::seed_from_u64(3);
        let mut state = TourState::new(&problem, start).unwrap();
        let mut best_ever = state.cost();
        let mut temperature = config.initial_temperature;
        while temperature >= config.min_temperature {
            for _ in 0..config.iterations_per_temperature {
                let mv = config.neighborhood.sample(problem.size(), &mut replay_rng);
                let delta = state.delta(mv).unwrap();
                if delta <= 0.0
                    || replay_rng.random_range(0.0..1.0) < (-delta / temperature).exp()
                {
                    state.apply(mv).unwrap();
                    best_ever = best_ever.min(state.cost());
                }
            }
            temperature *= config.cooling_ratio;
        }

        assert_eq!(state.tour(), &result.tour);
        assert!(
            result.cost > best_ever,
            "final cost {} should be above the best accepted cost {best_ever}",
            result.cost
        );
        assert!((result.tour.full_cost(&problem).unwrap() - result.cost).abs() < 1e-6);
    }

    #[test]
    fn test_sa_near_zero_temperature_is_greedy() {
        let (problem, tour) = random_instance(25, 14);
        let initial = tour.full_cost(&problem).unwrap();
        let config = SaConfig::default()
            .with_initial_temperature(1e-9)
            .with_min_temperature(5e-10)
            .with_cooling_ratio(0.5)
            .with_iterations_per_temperature(5_000)
            .with_seed(42);

        let result = SaRunner::run(&problem, tour, &config).unwrap();

        assert_eq!(result.worsening_moves, 0);
        assert!(result.cost <= initial);
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0] + 1e-9);
        }
    }

    #[test]
    fn test_sa_high_temperature_accepts_uphill() {
        let (problem, tour) = random_instance(20, 15);
        let config = SaConfig::default()
            .with_initial_temperature(1e8)
            .with_min_temperature(1e7)
            .with_cooling_ratio(0.5)
            .with_iterations_per_temperature(500)
            .with_seed(42);

        let result = SaRunner::run(&problem, tour, &config).unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.95,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
        assert!(result.worsening_moves > 0);
    }

    #[test]
    fn test_sa_seed_is_reproducible() {
        let (problem, tour) = random_instance(15, 16);
        let config = SaConfig::default()
            .with_neighborhood(Neighborhood::Swap)
            .with_seed(99);

        let a = SaRunner::run(&problem, tour.clone(), &config).unwrap();
        let b = SaRunner::run(&problem, tour, &config).unwrap();

        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost, b.cost);
    }

    #[test]
    fn test_sa_injected_rng() {
        let (problem, tour) = random_instance(15, 17);
        let config = SaConfig::default();
        let mut rng_a = StdRng::seed_from_u64(5);
        let mut rng_b = StdRng::seed_from_u64(5);

        let a = SaRunner::run_with_rng(&problem, tour.clone(), &config, &mut rng_a, None).unwrap();
        let b = SaRunner::run_with_rng(&problem, tour, &config, &mut rng_b, None).unwrap();

        assert_eq!(a.tour, b.tour);
    }

    #[test]
    fn test_sa_max_iterations_limit() {
        let (problem, tour) = random_instance(15, 18);
        let config = SaConfig::default()
            .with_iterations_per_temperature(10)
            .with_max_iterations(95)
            .with_seed(42);

        let result = SaRunner::run(&problem, tour, &config).unwrap();
        assert_eq!(result.iterations, 95);
    }

    #[test]
    fn test_sa_cancellation() {
        let (problem, tour) = random_instance(15, 19);
        let cancel = Arc::new(AtomicBool::new(true));
        let mut rng = StdRng::seed_from_u64(0);

        let result = SaRunner::run_with_rng(
            &problem,
            tour.clone(),
            &SaConfig::default(),
            &mut rng,
            Some(cancel),
        )
        .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.tour, tour);
    }

    #[test]
    fn test_sa_invalid_config() {
        let (problem, tour) = random_instance(5, 20);
        let config = SaConfig::default().with_cooling_ratio(1.5);
        assert!(matches!(
            SaRunner::run(&problem, tour, &config),
            Err(TspError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sa_verify_interval() {
        let (problem, tour) = random_instance(20, 21);
        let config = SaConfig::default().with_verify_interval(10).with_seed(8);
        let result = SaRunner::run(&problem, tour, &config).unwrap();
        assert!((result.tour.full_cost(&problem).unwrap() - result.cost).abs() < 1e-9);
    }
}
