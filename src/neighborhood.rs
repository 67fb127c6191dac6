//! Move evaluator: lazy enumeration of all candidate moves with deltas.

use rand::Rng;

use crate::problem::Problem;
use crate::tour::{Move, Tour, TourState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which move primitive a driver searches over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Neighborhood {
    /// Segment reversal (2-opt).
    #[default]
    Flip,
    /// Pairwise exchange.
    Swap,
}

/// A move together with the cost change it would cause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The move.
    pub mv: Move,
    /// Cost change if the move were applied to the current tour.
    pub delta: f64,
}

impl Neighborhood {
    /// Builds the move of this kind on 1-based positions `i < j`.
    pub fn make(self, i: usize, j: usize) -> Move {
        match self {
            Neighborhood::Flip => Move::Flip(i, j),
            Neighborhood::Swap => Move::Swap(i, j),
        }
    }

    /// Number of distinct moves on a tour of `n` cities: `n(n-1)/2`.
    pub fn size(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    /// Every move on the current tour with its delta, in ascending `i` then
    /// ascending `j`.
    ///
    /// Deltas are computed from the current tour only; nothing is applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_metaheur::{Neighborhood, Problem, Tour, TourState};
    ///
    /// let problem = Problem::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
    /// let state = TourState::new(&problem, Tour::identity(4)).unwrap();
    /// assert_eq!(Neighborhood::Flip.candidates(&state).count(), 6);
    /// ```
    pub fn candidates<'s>(self, state: &'s TourState<'_>) -> Candidates<'s> {
        Candidates {
            problem: state.problem(),
            tour: state.tour(),
            kind: self,
            a: 0,
            b: 1,
        }
    }

    /// Draws one move uniformly at random among the `n(n-1)/2` pairs.
    ///
    /// `n` must be at least 2.
    pub fn sample<R: Rng>(self, n: usize, rng: &mut R) -> Move {
        let a = rng.random_range(0..n);
        let mut b = rng.random_range(0..n - 1);
        if b >= a {
            b += 1;
        }
        self.make(a.min(b) + 1, a.max(b) + 1)
    }
}

/// Iterator returned by [`Neighborhood::candidates`].
#[derive(Debug, Clone)]
pub struct Candidates<'s> {
    problem: &'s Problem,
    tour: &'s Tour,
    kind: Neighborhood,
    // next 0-based pair
    a: usize,
    b: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let n = self.tour.len();
        while self.a + 1 < n {
            if self.b < n {
                let (a, b) = (self.a, self.b);
                self.b += 1;
                let delta = match self.kind {
                    Neighborhood::Flip => self.tour.flip_delta_unchecked(self.problem, a, b),
                    Neighborhood::Swap => self.tour.swap_delta_unchecked(self.problem, a, b),
                };
                return Some(Candidate {
                    mv: self.kind.make(a + 1, b + 1),
                    delta,
                });
            }
            self.a += 1;
            self.b = self.a + 1;
        }
        None
    }
}
