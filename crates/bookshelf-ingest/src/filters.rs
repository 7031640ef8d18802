//! Ingest-time filters.
//!
//! Books and files that fail these predicates never reach the catalog: we
//! don't deliver data our users can't use, so the allow-lists from
//! configuration are applied while the archive streams in, not at query
//! time.

use bookshelf_core::{Compression, EBook, PGFile, ZIP_FORMAT};

use crate::formats::mime_for;

/// Evaluates a candidate book; only books passing every filter are kept.
pub type EBookFilter = Box<dyn Fn(&EBook) -> bool + Send + Sync>;

/// Evaluates a candidate file; only files passing every filter are kept,
/// and a book that loses all its files is dropped.
pub type PGFileFilter = Box<dyn Fn(&PGFile) -> bool + Send + Sync>;

/// Keeps books whose language is in the allow-list.
pub fn language_filter(languages: Vec<String>) -> EBookFilter {
    Box::new(move |book| languages.iter().any(|l| book.language == *l))
}

/// Keeps files whose content type matches any of the friendly names in the
/// allow-list. Unknown friendly names are ignored.
///
/// Matching is by prefix against the file's base format (source format
/// strings carry charset parameters); the `zip` name additionally matches
/// any file stored zipped.
pub fn content_filter(content_types: Vec<String>) -> PGFileFilter {
    let mimes: Vec<&'static str> = content_types
        .iter()
        .filter_map(|name| mime_for(name))
        .collect();
    Box::new(move |file| {
        mimes.iter().any(|ct| {
            file.format.starts_with(ct)
                || (*ct == ZIP_FORMAT && file.compression == Compression::Zip)
        })
    })
}
