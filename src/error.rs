//! Error type shared by the problem model, tour primitives and drivers.

use std::fmt::{self, Display};

/// Errors raised by tour construction, move application and search setup.
///
/// All errors are raised synchronously at the point of violation. Nothing
/// is retried internally; a failed move leaves both tour and cost untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TspError {
    /// A city id outside `1..=n`.
    OutOfRange {
        /// The offending city id.
        city: usize,
        /// Number of cities in the problem.
        n: usize,
    },
    /// A tour position outside `1..=n`, or a position pair the move forbids
    /// (equal positions, or `i > j` for a segment reversal).
    InvalidPosition {
        /// First position of the move.
        i: usize,
        /// Second position of the move.
        j: usize,
        /// Tour length.
        n: usize,
    },
    /// The supplied tour is not a permutation of `1..=n`.
    InvalidTour(String),
    /// The cost matrix violates a structural invariant.
    InvalidProblem(String),
    /// A search parameter is out of its valid range.
    InvalidParameter(String),
    /// The incrementally tracked cost drifted away from the recomputed one.
    CostDrift {
        /// Cost tracked by applying deltas.
        tracked: f64,
        /// Cost recomputed from scratch.
        actual: f64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;

impl Display for TspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { city, n } => {
                write!(f, "city {city} is out of range 1..={n}")
            }
            Self::InvalidPosition { i, j, n } => {
                write!(f, "invalid move positions ({i}, {j}) for tour of length {n}")
            }
            Self::InvalidTour(reason) => write!(f, "invalid tour: {reason}"),
            Self::InvalidProblem(reason) => write!(f, "invalid problem: {reason}"),
            Self::InvalidParameter(reason) => write!(f, "invalid parameter: {reason}"),
            Self::CostDrift { tracked, actual } => write!(
                f,
                "tracked cost {tracked} differs from recomputed cost {actual}"
            ),
        }
    }
}

impl std::error::Error for TspError {}
