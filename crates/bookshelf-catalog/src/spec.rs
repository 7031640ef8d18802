//! The complete description of one query: constraints plus result shaping.

use std::fmt;

use crate::constraint::{Combiner, Constraint};

/// Results per page when the request doesn't say otherwise.
pub const DEFAULT_LIMIT: usize = 25;

/// A complete set of constraints for one query.
///
/// `page` is in units of `limit` (zero-indexed); when `random` is set,
/// `page` is ignored and the executor draws a uniform sample instead.
pub struct ConstraintSpec {
    /// Constraints a candidate must satisfy (combined by
    /// [`Self::include_combiner`]); empty means every book is a candidate.
    pub includes: Vec<Constraint>,
    pub include_combiner: Combiner,
    /// Constraints that disqualify a candidate (combined by
    /// [`Self::exclude_combiner`]); empty means nothing is disqualified.
    pub excludes: Vec<Constraint>,
    pub exclude_combiner: Combiner,
    pub limit: usize,
    pub page: usize,
    pub random: bool,
}

impl Default for ConstraintSpec {
    /// An unconstrained spec that returns all results, [`DEFAULT_LIMIT`] at
    /// a time: includes combine with AND, excludes with OR.
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            include_combiner: Combiner::And,
            excludes: Vec::new(),
            exclude_combiner: Combiner::Or,
            limit: DEFAULT_LIMIT,
            page: 0,
            random: false,
        }
    }
}

impl fmt::Debug for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSpec")
            .field("includes", &self.includes.len())
            .field("include_combiner", &self.include_combiner)
            .field("excludes", &self.excludes.len())
            .field("exclude_combiner", &self.exclude_combiner)
            .field("limit", &self.limit)
            .field("page", &self.page)
            .field("random", &self.random)
            .finish()
    }
}
