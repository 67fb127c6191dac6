//! Tabu Search (TS).
//!
//! Every iteration applies the best admissible move, improving or not, and
//! forbids the two positions it touched for the next `tabu_tenure`
//! iterations. The search never stops at a local optimum; it runs for the
//! whole iteration budget.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
pub use types::TabuList;
