//! Simulated Annealing (SA).
//!
//! Proposes one random move per iteration and accepts worsening moves with
//! the Metropolis probability `exp(-delta / T)`. The temperature cools
//! geometrically after a fixed number of proposals per level.
//!
//! The returned tour is the last accepted state, not the best one seen.
//! Callers that want the incumbent must track it themselves.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
