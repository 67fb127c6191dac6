//! Immutable TSP instance: a square cost matrix over cities `1..=n`.

use crate::error::{Result, TspError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A TSP instance.
///
/// Cities are identified by `1..=n`. The matrix is validated once at
/// construction and never mutated afterwards, so a single `Problem` can be
/// shared by reference across any number of independent searches.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::Problem;
///
/// let problem = Problem::from_points(&[(0.0, 0.0), (3.0, 4.0)]).unwrap();
/// assert_eq!(problem.size(), 2);
/// assert!((problem.distance(1, 2).unwrap() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Problem {
    n: usize,
    /// Row-major `n * n` costs, 0-based.
    costs: Vec<f64>,
}

impl Problem {
    /// Builds a problem from a square cost matrix.
    ///
    /// Fails with [`TspError::InvalidProblem`] if the matrix is not square,
    /// has fewer than two cities, a non-zero diagonal, or a negative or
    /// non-finite entry.
    pub fn new(matrix: Vec<Vec<f64>>) -> Result<Self> {
        let n = matrix.len();
        if n < 2 {
            return Err(TspError::InvalidProblem(format!(
                "at least 2 cities required, got {n}"
            )));
        }

        let mut costs = Vec::with_capacity(n * n);
        for (i, row) in matrix.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::InvalidProblem(format!(
                    "row {} has {} entries, expected {n}",
                    i + 1,
                    row.len()
                )));
            }
            for (j, &c) in row.iter().enumerate() {
                if !c.is_finite() || c < 0.0 {
                    return Err(TspError::InvalidProblem(format!(
                        "cost({}, {}) = {c} must be finite and non-negative",
                        i + 1,
                        j + 1
                    )));
                }
                if i == j && c != 0.0 {
                    return Err(TspError::InvalidProblem(format!(
                        "cost({0}, {0}) = {c} must be zero",
                        i + 1
                    )));
                }
            }
            costs.extend(row);
        }

        Ok(Self { n, costs })
    }

    /// Builds a Euclidean problem from planar coordinates.
    ///
    /// City `k` is `points[k - 1]`.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let matrix = points
            .iter()
            .map(|&(x1, y1)| {
                points
                    .iter()
                    .map(|&(x2, y2)| (x1 - x2).hypot(y1 - y2))
                    .collect()
            })
            .collect();
        Self::new(matrix)
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Cost of travelling from city `i` to city `j`.
    ///
    /// Fails with [`TspError::OutOfRange`] if either id is outside `1..=n`.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        for city in [i, j] {
            if city == 0 || city > self.n {
                return Err(TspError::OutOfRange { city, n: self.n });
            }
        }
        Ok(self.cost(i, j))
    }

    /// Whether `cost(i, j) == cost(j, i)` for every pair.
    ///
    /// The segment-reversal delta is only exact on symmetric instances.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| {
            (i + 1..self.n).all(|j| self.costs[i * self.n + j] == self.costs[j * self.n + i])
        })
    }

    /// Unchecked lookup for city ids already known to be in range.
    #[inline]
    pub(crate) fn cost(&self, i: usize, j: usize) -> f64 {
        self.costs[(i - 1) * self.n + (j - 1)]
    }
}
