//! Aggregate statistics over the active dataset.
//!
//! One pass over the snapshot, counting books, file variants, and the
//! domains of the language/type/format fields. The format counts are per
//! MIME variant: a zip-compressed file contributes both its base format and
//! the zip sentinel, mirroring how the source data lists it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use bookshelf_core::{Compression, EBook, ZIP_FORMAT};

/// Collection-level information about the data on hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_books: usize,
    /// File variants, not files: each MIME type a file is available as
    /// counts once.
    pub total_files: usize,
    /// Book count per language code.
    pub languages: HashMap<String, usize>,
    /// Book count per record type.
    pub types: HashMap<String, usize>,
    /// Variant count per MIME format string.
    pub formats: HashMap<String, usize>,
    /// Mean word-index size across all books.
    pub avg_index_size: f64,
}

pub(crate) fn compute(books: &[EBook]) -> CatalogStats {
    let mut stats = CatalogStats::default();
    let mut index_total = 0usize;

    for book in books {
        stats.total_books += 1;
        *stats.languages.entry(book.language.clone()).or_insert(0) += 1;
        *stats.types.entry(book.book_type.clone()).or_insert(0) += 1;
        index_total += book.words.len();

        for file in &book.files {
            stats.total_files += 1;
            *stats.formats.entry(file.format.clone()).or_insert(0) += 1;
            if file.compression == Compression::Zip {
                stats.total_files += 1;
                *stats.formats.entry(ZIP_FORMAT.to_string()).or_insert(0) += 1;
            }
        }
    }

    if !books.is_empty() {
        stats.avg_index_size = index_total as f64 / books.len() as f64;
    }
    stats
}
