//! The in-memory catalog store and its query executor.
//!
//! [`Catalog`] holds the one mutable piece of shared state in the process:
//! the active dataset (a vector of books in insertion order) plus an
//! ID→position index kept in sync with it. Readers take a shared lock and
//! may run in parallel; the timer-driven refresh takes the exclusive lock
//! for the duration of one vector swap. A query therefore observes either
//! the entire pre-update snapshot or the entire post-update snapshot, never
//! a mix.
//!
//! Iteration order is the insertion order supplied to [`Catalog::update`],
//! which is what makes paging stable and random sampling reproducible under
//! a fixed seed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bookshelf_core::EBook;

use crate::spec::ConstraintSpec;
use crate::stats::{self, CatalogStats};

#[derive(Default)]
struct Snapshot {
    books: Vec<EBook>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    fn rebuild_index(&mut self) {
        self.index = self
            .books
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
    }
}

/// The process-wide book dataset, shared between request handlers and the
/// background refresh.
#[derive(Default)]
pub struct Catalog {
    inner: RwLock<Snapshot>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock means a reader panicked mid-query; the snapshot
    // itself is still coherent, so recover rather than propagate.
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the entire dataset. Atomic from the readers' perspective:
    /// queries started after this returns see exclusively the new contents.
    pub fn update(&self, books: Vec<EBook>) {
        let mut snap = self.write();
        snap.books = books;
        snap.rebuild_index();
    }

    /// Appends books to the dataset. Exists for bulk-building test data;
    /// the service itself only ever replaces wholesale.
    pub fn add(&self, books: impl IntoIterator<Item = EBook>) {
        let mut snap = self.write();
        for book in books {
            let pos = snap.books.len();
            snap.index.insert(book.id.clone(), pos);
            snap.books.push(book);
        }
    }

    /// Looks up a book by ID through the position index.
    pub fn get(&self, id: &str) -> Option<EBook> {
        let snap = self.read();
        snap.index.get(id).map(|&i| snap.books[i].clone())
    }

    /// Number of books in the active dataset.
    pub fn n_books(&self) -> usize {
        self.read().books.len()
    }

    /// Runs a query against the active dataset.
    ///
    /// In paged mode the walk skips the first `limit × page` candidates and
    /// stops as soon as `limit` books are collected. In random mode the
    /// entire candidate stream is reservoir-sampled with a fresh
    /// wall-clock-seeded generator, giving every matching book the same
    /// chance of appearing.
    pub fn query(&self, spec: &ConstraintSpec) -> Vec<EBook> {
        tracing::debug!(?spec, "executing query");
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        self.query_with_rng(spec, &mut StdRng::seed_from_u64(seed))
    }

    /// Like [`Self::query`] but sampling from the caller's generator, so
    /// random-mode results are reproducible given a fixed seed.
    pub fn query_with_rng(&self, spec: &ConstraintSpec, rng: &mut impl Rng) -> Vec<EBook> {
        let include = spec.include_combiner.combine(&spec.includes);
        let exclude = spec.exclude_combiner.combine(&spec.excludes);
        let is_candidate = |book: &EBook| {
            (spec.includes.is_empty() || include.matches(book))
                && !(!spec.excludes.is_empty() && exclude.matches(book))
        };

        let snap = self.read();
        let mut result = Vec::new();
        let mut match_count = 0usize;

        if spec.random {
            // Reservoir sampling: keep the first `limit` candidates, then
            // replace a random slot with probability limit/match_count.
            // Always walks to the end of the dataset.
            for book in &snap.books {
                if !is_candidate(book) {
                    continue;
                }
                match_count += 1;
                if result.len() < spec.limit {
                    result.push(book.clone());
                } else {
                    let slot = rng.gen_range(0..match_count);
                    if slot < spec.limit {
                        result[slot] = book.clone();
                    }
                }
            }
        } else {
            for book in &snap.books {
                if !is_candidate(book) {
                    continue;
                }
                match_count += 1;
                // The first limit×page candidates belong to earlier pages.
                if match_count <= spec.limit.saturating_mul(spec.page) {
                    continue;
                }
                result.push(book.clone());
                if result.len() >= spec.limit {
                    break;
                }
            }
        }
        result
    }

    /// Counts the books matching a spec, ignoring limit, page, and random.
    pub fn count(&self, spec: &ConstraintSpec) -> usize {
        let include = spec.include_combiner.combine(&spec.includes);
        let exclude = spec.exclude_combiner.combine(&spec.excludes);
        self.read()
            .books
            .iter()
            .filter(|book| {
                (spec.includes.is_empty() || include.matches(book))
                    && !(!spec.excludes.is_empty() && exclude.matches(book))
            })
            .count()
    }

    /// Aggregate statistics over the active dataset.
    pub fn stats(&self) -> CatalogStats {
        stats::compute(&self.read().books)
    }
}
