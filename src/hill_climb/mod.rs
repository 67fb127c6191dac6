//! Steepest-descent hill climbing.
//!
//! Each iteration scans the whole neighborhood, applies the single most
//! improving move and stops at the first tour no move improves (a local
//! optimum) or when the iteration cap is hit.
//!
//! # References
//!
//! - Croes, G.A. (1958). "A method for solving traveling salesman problems"
//! - Lin, S. (1965). "Computer solutions of the traveling salesman problem"

mod config;
mod runner;

pub use config::HillClimbConfig;
pub use runner::{HillClimbResult, HillClimbRunner, Termination};
