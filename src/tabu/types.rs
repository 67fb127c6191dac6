//! Tabu record keyed by tour position.

/// Expiry iteration per tour position.
///
/// A position with expiry `e` may not be a move endpoint in any iteration
/// `t <= e`. Positions never touched have no expiry and are always
/// admissible; expired entries stay in place but are inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabuList {
    // 0 = no entry; iterations are 1-indexed
    expiry: Vec<usize>,
}

impl TabuList {
    /// An empty record for a tour of `n` positions.
    pub fn new(n: usize) -> Self {
        Self {
            expiry: vec![0; n],
        }
    }

    /// Whether 1-based `position` is forbidden in `iteration`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in `1..=n`.
    pub fn is_tabu(&self, position: usize, iteration: usize) -> bool {
        self.expiry[position - 1] >= iteration
    }

    /// Forbids 1-based `position` up to and including iteration `until`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in `1..=n`.
    pub fn forbid(&mut self, position: usize, until: usize) {
        self.expiry[position - 1] = until;
    }

    /// Recorded expiry of 1-based `position`, if it was ever forbidden.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in `1..=n`.
    pub fn expiry(&self, position: usize) -> Option<usize> {
        match self.expiry[position - 1] {
            0 => None,
            e => Some(e),
        }
    }
}
