//! bookshelf-catalog: the in-memory catalog engine.
//!
//! This crate provides:
//! - The process-wide [`Catalog`] store with atomic dataset replacement
//! - The constraint algebra ([`Constraint`], [`Combiner`]) and the
//!   text-to-constraint compiler ([`constraint_from_text`])
//! - The query executor (paged walks and reservoir-sampled random picks)
//! - Aggregate statistics over the active dataset
//! - The request adapter turning flat query parameters into a
//!   [`ConstraintSpec`]
//!
//! # Architecture
//!
//! The store holds one immutable snapshot at a time behind a reader-writer
//! lock: many concurrent readers, one rare timer-driven writer. Queries walk
//! the snapshot in insertion order applying compiled predicates; nothing in
//! this crate performs I/O.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookshelf_catalog::{Catalog, ConstraintSpec, constraint_from_text};
//!
//! let catalog = Catalog::new();
//! catalog.update(books);
//!
//! let mut spec = ConstraintSpec::default();
//! let (constraint, exclude) = constraint_from_text("creator", "eve")?;
//! assert!(!exclude);
//! spec.includes.push(constraint);
//!
//! let hits = catalog.query(&spec);
//! let total = catalog.count(&spec);
//! ```

pub mod compile;
pub mod constraint;
pub mod error;
pub mod request;
pub mod spec;
pub mod stats;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use compile::constraint_from_text;
pub use constraint::{Combiner, Constraint, and, or};
pub use error::{QueryError, QueryResult};
pub use request::constraint_spec_from_params;
pub use spec::{ConstraintSpec, DEFAULT_LIMIT};
pub use stats::CatalogStats;
pub use store::Catalog;
