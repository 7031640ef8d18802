//! Error types for query construction.
//!
//! Everything here maps to a client error (HTTP 400): a malformed
//! constraint, an out-of-range limit, or a bad page number. The store itself
//! never errors; a well-formed [`crate::ConstraintSpec`] always executes.

use thiserror::Error;

/// Result type alias for query-construction operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while turning request input into a constraint spec.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The constraint name is unknown or its value cannot be compiled.
    #[error("bad constraint: {0}")]
    BadConstraint(String),

    /// The limit parameter is missing the allowed range.
    #[error("limit must be >0 and <={0}")]
    BadLimit(usize),

    /// The page parameter is not a non-negative integer.
    #[error("page must be numeric and >=0")]
    BadPage,

    /// A search value reduced to zero words.
    #[error("invalid search string: {0}")]
    EmptySearch(String),
}
