//! Named HTML templates, loaded from a directory on disk.
//!
//! Templates are authored content, not runtime input: drop a new
//! `<name>.tmpl` file into the template directory and refer to it in the
//! request path. Parsed sources are cached; the no-cache mode re-reads the
//! file on every render, which makes editing templates pleasant.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{LazyLock, PoisonError, RwLock};

use minijinja::Environment;
use regex::Regex;

use bookshelf_core::EBook;

use crate::error::ApiError;

/// Template names are short lowercase alphanumerics — they come straight
/// out of a URL path segment.
static NAME_PAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9]{1,16}$").expect("name pattern is valid"));

/// Loads, caches, and renders the named HTML templates.
pub struct TemplateStore {
    dir: PathBuf,
    no_cache: bool,
    sources: RwLock<HashMap<String, String>>,
}

impl TemplateStore {
    /// Creates a store reading `<name>.tmpl` files under `dir`. With
    /// `no_cache` set, every render re-reads the file.
    pub fn new(dir: PathBuf, no_cache: bool) -> Self {
        Self {
            dir,
            no_cache,
            sources: RwLock::new(HashMap::new()),
        }
    }

    fn load_source(&self, name: &str) -> Result<String, ApiError> {
        if !self.no_cache {
            let cache = self
                .sources
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(source) = cache.get(name) {
                return Ok(source.clone());
            }
        }

        let path = self.dir.join(format!("{name}.tmpl"));
        let source = std::fs::read_to_string(&path)
            .map_err(|_| ApiError::BadRequest(format!("couldn't find template {name}")))?;

        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), source.clone());
        Ok(source)
    }

    /// Renders the named template over a query result.
    ///
    /// The template sees `books` (the result array) and `count` (its
    /// length). Unknown names, missing files, and template errors all
    /// surface as bad requests with a diagnostic.
    pub fn render(&self, name: &str, books: &[EBook]) -> Result<String, ApiError> {
        let name = name.to_lowercase();
        if !NAME_PAT.is_match(&name) {
            return Err(ApiError::BadRequest(format!("bad name: {name}")));
        }

        let source = self.load_source(&name)?;

        let mut env = Environment::new();
        env.add_template(&name, &source)
            .map_err(|e| ApiError::BadRequest(format!("parse failure parsing {name} ({e})")))?;
        let template = env
            .get_template(&name)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        template
            .render(minijinja::context! { books => books, count => books.len() })
            .map_err(|e| ApiError::BadRequest(format!("render failure in {name} ({e})")))
    }
}
