//! Word extraction for the per-book index and text queries.
//!
//! A "word" is a maximal run of `[a-z0-9_]` after lowercasing. This feeds
//! both the word index built at ingest and the pre-filter applied to text
//! queries, so the two sides agree on tokenization by construction.

use std::sync::LazyLock;

use regex::Regex;

/// Splits on any run of characters outside the word alphabet.
static WORD_PAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9_]+").expect("word pattern is valid"));

/// Returns the lowercased alphanumeric words of `s`, in order, empties
/// dropped. Duplicates are preserved; callers that want a set collect into
/// one.
pub fn words(s: &str) -> Vec<String> {
    WORD_PAT
        .split(&s.to_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
