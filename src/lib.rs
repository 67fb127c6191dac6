//! Local-search metaheuristics for the Traveling Salesman Problem.
//!
//! Provides a tour/move layer with O(1) incremental cost deltas and three
//! search drivers built on it:
//!
//! - **Hill climbing**: steepest descent over the full neighborhood until
//!   no move improves the tour.
//! - **Simulated Annealing (SA)**: one random move per iteration with
//!   Metropolis acceptance and geometric cooling.
//! - **Tabu Search (TS)**: best admissible move every iteration, with a
//!   per-position tabu horizon to escape local optima.
//!
//! Two move primitives are supported: pairwise exchange ([`Move::Swap`]) and
//! segment reversal ([`Move::Flip`], i.e. 2-opt). All drivers mutate the
//! tour only through [`TourState::apply`], which keeps the tour and its
//! tracked cost consistent.
//!
//! # Architecture
//!
//! The [`Problem`] is immutable and shared by reference; every driver owns
//! the tour it is improving. Problem construction beyond a Euclidean
//! convenience constructor, constructive tour builders and plotting live
//! outside this crate and interact with it only through [`Problem`] and
//! [`Tour`].
//!
//! # Examples
//!
//! ```
//! use tsp_metaheur::{hill_climb, tabu_search, Problem, Tour};
//!
//! let problem = Problem::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
//! let (tour, cost) = hill_climb(&problem, Tour::new(vec![1, 3, 2, 4]).unwrap(), 1_000).unwrap();
//! assert!((cost - 4.0).abs() < 1e-9);
//!
//! let (_, _, trace) = tabu_search(&problem, tour, 1, 5).unwrap();
//! assert_eq!(trace.len(), 5);
//! ```

pub mod error;
pub mod hill_climb;
pub mod neighborhood;
pub mod problem;
pub mod sa;
pub mod search;
pub mod tabu;
pub mod tour;

pub use error::{Result, TspError};
pub use neighborhood::{Candidate, Neighborhood};
pub use problem::Problem;
pub use search::{hill_climb, simulated_anneal, tabu_search, SearchOutcome, Strategy};
pub use tour::{Move, Tour, TourState};
