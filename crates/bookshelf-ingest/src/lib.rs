//! bookshelf-ingest: turning the upstream catalog archive into books.
//!
//! This crate provides:
//! - The streaming RDF/XML → domain transformer ([`rdf`])
//! - The [`Loader`] with its ingest-time filters and load cap
//! - The content-type table mapping friendly format names to MIME strings
//! - The fetch/refresh task that acquires the archive (HTTP or local
//!   file), decompresses it, and swaps the result into the catalog on a
//!   timer
//!
//! The loader is a pure transformer: it never touches the catalog store.
//! Only the refresh task in [`fetch`] publishes datasets.

pub mod error;
pub mod fetch;
pub mod filters;
pub mod formats;
pub mod loader;
pub mod rdf;

pub use error::{IngestError, IngestResult};
pub use fetch::{RefreshConfig, run};
pub use filters::{EBookFilter, PGFileFilter, content_filter, language_filter};
pub use formats::content_types;
pub use loader::Loader;
