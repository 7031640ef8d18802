//! Core domain types for the bookshelf catalog server.
//!
//! This crate defines the vocabulary shared by the ingest pipeline, the
//! catalog store, and the HTTP surface:
//!
//! - [`Date`] — a fuzzy partial date (year, year-month-day, or absent)
//! - [`words`] — the lowercase alphanumeric tokenizer behind the word index
//! - [`EBook`], [`Agent`], [`PGFile`] — the catalog records themselves
//!
//! Everything here is plain data: no I/O, no locking, no async.

pub mod date;
pub mod types;
pub mod words;

pub use date::Date;
pub use types::{Agent, Compression, EBook, EBookBuilder, PGFile, ZIP_FORMAT};
pub use words::words;
