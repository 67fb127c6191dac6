//! Tours, the two move primitives and their O(1) cost deltas.
//!
//! Positions in the public API are 1-based (`1..=n`), matching city ids.
//! Internally everything is 0-based.
//!
//! # Delta formulas
//!
//! For an exchange of positions `a` and `b` only the edges incident to those
//! positions change. With `e_k` the edge leaving position `k`:
//!
//! ```text
//! delta = Σ_{k ∈ {a-1, a, b-1, b}} cost'(e_k) - cost(e_k)
//! ```
//!
//! where the index set is deduplicated, so adjacent positions (including the
//! first/last pair) count their shared edge once.
//!
//! Reversing positions `[i, j]` keeps every internal edge (on a symmetric
//! matrix) and only replaces the two boundary edges:
//!
//! ```text
//! delta = d(t[i-1], t[j]) + d(t[i], t[j+1]) - d(t[i-1], t[i]) - d(t[j], t[j+1])
//! ```
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::{Result, TspError};
use crate::problem::Problem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing tracked and recomputed costs.
pub const COST_TOLERANCE: f64 = 1e-6;

/// A closed tour over cities `1..=n`.
///
/// The city sequence is always a permutation: it is checked on construction
/// and the only mutators are [`Tour::swap`] and [`Tour::flip`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tour {
    cities: Vec<usize>,
}

/// A local-search move on two 1-based tour positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Move {
    /// Exchange the cities at the two positions.
    Swap(usize, usize),
    /// Reverse the segment between the two positions (inclusive, `i < j`).
    Flip(usize, usize),
}

impl Move {
    /// The two positions the move touches.
    pub fn positions(&self) -> (usize, usize) {
        match *self {
            Move::Swap(i, j) | Move::Flip(i, j) => (i, j),
        }
    }
}

impl Tour {
    /// Creates a tour from a city sequence.
    ///
    /// Fails with [`TspError::InvalidTour`] unless `cities` is a non-empty
    /// permutation of `1..=cities.len()`.
    pub fn new(cities: Vec<usize>) -> Result<Self> {
        if cities.is_empty() {
            return Err(TspError::InvalidTour("tour is empty".into()));
        }
        if !is_permutation(&cities) {
            return Err(TspError::InvalidTour(format!(
                "{cities:?} is not a permutation of 1..={}",
                cities.len()
            )));
        }
        Ok(Self { cities })
    }

    /// The tour `1, 2, ..., n`.
    ///
    /// `n` should be at least 2. `identity(0)` is an empty tour, which
    /// [`Tour::full_cost`] and [`TourState::new`] reject.
    pub fn identity(n: usize) -> Self {
        Self {
            cities: (1..=n).collect(),
        }
    }

    /// A uniformly random tour over `n` cities. The same size caveat as
    /// [`Tour::identity`] applies.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut cities: Vec<usize> = (1..=n).collect();
        cities.shuffle(rng);
        Self { cities }
    }

    /// Number of cities on the tour.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// True only for the empty tour built by `identity(0)` or `random(0, _)`.
    /// [`Tour::new`] never returns one.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// The city sequence.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Consumes the tour, returning the city sequence.
    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }

    /// City at 1-based position `pos`.
    pub fn city_at(&self, pos: usize) -> Result<usize> {
        self.index(pos).map(|k| self.cities[k])
    }

    /// True iff the tour is a permutation of exactly `1..=n`.
    pub fn is_valid(&self) -> bool {
        is_permutation(&self.cities)
    }

    /// Total cost of the closed tour, including the edge back to the start.
    ///
    /// O(n). Fails with [`TspError::InvalidTour`] if the tour length does not
    /// match the problem size.
    pub fn full_cost(&self, problem: &Problem) -> Result<f64> {
        self.check_size(problem)?;
        Ok(self.full_cost_unchecked(problem))
    }

    pub(crate) fn full_cost_unchecked(&self, problem: &Problem) -> f64 {
        let n = self.cities.len();
        (0..n)
            .map(|k| problem.cost(self.cities[k], self.cities[(k + 1) % n]))
            .sum()
    }

    /// Exchanges the cities at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let (a, b) = self.pair(i, j, false)?;
        self.cities.swap(a, b);
        Ok(())
    }

    /// Reverses the segment of positions `[i, j]`, `i < j`.
    pub fn flip(&mut self, i: usize, j: usize) -> Result<()> {
        let (a, b) = self.pair(i, j, true)?;
        self.cities[a..=b].reverse();
        Ok(())
    }

    /// Cost change of [`Tour::swap`] without applying it. O(1).
    pub fn swap_delta(&self, problem: &Problem, i: usize, j: usize) -> Result<f64> {
        self.check_size(problem)?;
        let (a, b) = self.pair(i, j, false)?;
        Ok(self.swap_delta_unchecked(problem, a, b))
    }

    /// Cost change of [`Tour::flip`] without applying it. O(1).
    ///
    /// Exact on symmetric matrices only.
    pub fn flip_delta(&self, problem: &Problem, i: usize, j: usize) -> Result<f64> {
        self.check_size(problem)?;
        let (a, b) = self.pair(i, j, true)?;
        Ok(self.flip_delta_unchecked(problem, a, b))
    }

    /// Cost change of `mv` without applying it.
    pub fn delta(&self, problem: &Problem, mv: Move) -> Result<f64> {
        match mv {
            Move::Swap(i, j) => self.swap_delta(problem, i, j),
            Move::Flip(i, j) => self.flip_delta(problem, i, j),
        }
    }

    /// Applies `mv` in place.
    pub fn apply(&mut self, mv: Move) -> Result<()> {
        match mv {
            Move::Swap(i, j) => self.swap(i, j),
            Move::Flip(i, j) => self.flip(i, j),
        }
    }

    /// `a`, `b` are distinct 0-based positions.
    pub(crate) fn swap_delta_unchecked(&self, problem: &Problem, a: usize, b: usize) -> f64 {
        let n = self.cities.len();
        let c = &self.cities;

        let mut edges = [0usize; 4];
        let mut count = 0;
        for e in [(a + n - 1) % n, a, (b + n - 1) % n, b] {
            if !edges[..count].contains(&e) {
                edges[count] = e;
                count += 1;
            }
        }

        let after = |k: usize| {
            if k == a {
                c[b]
            } else if k == b {
                c[a]
            } else {
                c[k]
            }
        };

        edges[..count]
            .iter()
            .map(|&e| {
                let next = (e + 1) % n;
                problem.cost(after(e), after(next)) - problem.cost(c[e], c[next])
            })
            .sum()
    }

    /// `a < b` are 0-based positions.
    pub(crate) fn flip_delta_unchecked(&self, problem: &Problem, a: usize, b: usize) -> f64 {
        let n = self.cities.len();
        // Reversing n or n-1 cities only changes the cycle's orientation.
        if b - a + 2 >= n {
            return 0.0;
        }
        let c = &self.cities;
        let prev = c[(a + n - 1) % n];
        let next = c[(b + 1) % n];
        problem.cost(prev, c[b]) + problem.cost(c[a], next)
            - problem.cost(prev, c[a])
            - problem.cost(c[b], next)
    }

    fn index(&self, pos: usize) -> Result<usize> {
        if pos == 0 || pos > self.cities.len() {
            return Err(TspError::InvalidPosition {
                i: pos,
                j: pos,
                n: self.cities.len(),
            });
        }
        Ok(pos - 1)
    }

    fn pair(&self, i: usize, j: usize, ordered: bool) -> Result<(usize, usize)> {
        let n = self.cities.len();
        let in_range = (1..=n).contains(&i) && (1..=n).contains(&j);
        if !in_range || i == j || (ordered && i > j) {
            return Err(TspError::InvalidPosition { i, j, n });
        }
        Ok((i - 1, j - 1))
    }

    fn check_size(&self, problem: &Problem) -> Result<()> {
        if self.cities.len() != problem.size() {
            return Err(TspError::InvalidTour(format!(
                "tour has {} cities, problem has {}",
                self.cities.len(),
                problem.size()
            )));
        }
        Ok(())
    }
}

fn is_permutation(cities: &[usize]) -> bool {
    let n = cities.len();
    let mut seen = vec![false; n + 1];
    for &city in cities {
        if city == 0 || city > n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// A tour paired with its incrementally tracked cost.
///
/// This is the single mutation point used by every driver: [`TourState::apply`]
/// validates a move, computes its delta and only then updates tour and cost
/// together, so the two never disagree.
#[derive(Debug, Clone)]
pub struct TourState<'p> {
    problem: &'p Problem,
    tour: Tour,
    cost: f64,
}

impl<'p> TourState<'p> {
    /// Wraps `tour`, computing its cost from scratch.
    ///
    /// Fails with [`TspError::InvalidTour`] if the tour is not a permutation
    /// or its length does not match the problem.
    pub fn new(problem: &'p Problem, tour: Tour) -> Result<Self> {
        if !tour.is_valid() {
            return Err(TspError::InvalidTour(format!(
                "{:?} is not a permutation of 1..={}",
                tour.cities,
                tour.len()
            )));
        }
        let cost = tour.full_cost(problem)?;
        Ok(Self {
            problem,
            tour,
            cost,
        })
    }

    /// The problem this tour is evaluated against.
    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    /// Current tour.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Tracked cost of the current tour.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Cost change `mv` would cause.
    pub fn delta(&self, mv: Move) -> Result<f64> {
        self.tour.delta(self.problem, mv)
    }

    /// Applies `mv` and returns its delta.
    ///
    /// On error neither the tour nor the cost changes.
    pub fn apply(&mut self, mv: Move) -> Result<f64> {
        let delta = self.delta(mv)?;
        self.tour.apply(mv)?;
        self.cost += delta;
        Ok(delta)
    }

    /// Reverts a previously applied `mv`. Both moves are self-inverse.
    pub fn undo(&mut self, mv: Move) -> Result<f64> {
        self.apply(mv)
    }

    /// Recomputes the full cost and compares it with the tracked one.
    ///
    /// Fails with [`TspError::CostDrift`] if they differ by more than
    /// [`COST_TOLERANCE`] (relative). On success the tracked cost is
    /// resynchronised to the recomputed value.
    pub fn verify(&mut self) -> Result<()> {
        let actual = self.tour.full_cost_unchecked(self.problem);
        if (actual - self.cost).abs() > COST_TOLERANCE * actual.abs().max(1.0) {
            warn!(tracked = self.cost, actual, "tour cost drift detected");
            return Err(TspError::CostDrift {
                tracked: self.cost,
                actual,
            });
        }
        self.cost = actual;
        Ok(())
    }

    /// Runs [`TourState::verify`] when `iteration` is a multiple of `interval`.
    /// An interval of 0 disables the check.
    pub(crate) fn verify_every(&mut self, iteration: usize, interval: usize) -> Result<()> {
        if interval > 0 && iteration % interval == 0 {
            self.verify()?;
        }
        Ok(())
    }

    /// Consumes the state, returning the tour and its cost.
    pub fn into_parts(self) -> (Tour, f64) {
        (self.tour, self.cost)
    }
}
