//! The friendly-name → MIME table for download formats.
//!
//! Configuration names formats by short friendly names (`epub`, `mobi`,
//! `plain_utf8`); the source data names them by MIME strings, often with a
//! charset parameter attached. Matching is by prefix so that
//! `text/plain; charset="us-ascii"` satisfies `plain_ascii` and bare
//! `text/plain` satisfies `plain`.

use std::collections::HashMap;
use std::sync::LazyLock;

use bookshelf_core::ZIP_FORMAT;

static CONTENT_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("plain", "text/plain"),
        ("plain_utf8", r#"text/plain; charset="utf-8""#),
        ("plain_ascii", r#"text/plain; charset="us-ascii""#),
        ("plain_8859.1", r#"text/plain; charset="iso-8859-1""#),
        ("html", "text/html"),
        ("epub", "application/epub+zip"),
        ("mobi", "application/x-mobipocket-ebook"),
        ("plucker", "application/prs.plucker"),
        ("zip", ZIP_FORMAT),
    ])
});

/// The full friendly-name → MIME mapping.
pub fn content_types() -> &'static HashMap<&'static str, &'static str> {
    &CONTENT_TYPES
}

/// Resolves one friendly name; unknown names get `None`.
pub fn mime_for(friendly: &str) -> Option<&'static str> {
    CONTENT_TYPES.get(friendly).copied()
}
