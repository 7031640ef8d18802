//! The constraint algebra: predicates over books and the combinators that
//! compose them.
//!
//! A [`Constraint`] wraps a boxed predicate `EBook -> bool` behind a single
//! [`Constraint::matches`] method; queries are built by combining
//! constraints with [`and`] / [`or`]. Both combinators reduce an empty
//! input to the canonical always-false constraint — "empty means match all"
//! is the executor's decision, made before the combiner ever runs.
//!
//! Text matching happens in two phases: a cheap membership test against the
//! book's word index, then a whole-word regex over the actual field. The
//! pre-filter is where the query throughput comes from; the regex only runs
//! on books that already contain every queried word.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;

use bookshelf_core::{Agent, Date, EBook, words};

/// A predicate over books, the universal currency of query clauses.
///
/// Cheap to clone; the underlying closure is shared.
#[derive(Clone)]
pub struct Constraint(Arc<dyn Fn(&EBook) -> bool + Send + Sync>);

impl Constraint {
    /// Wraps a predicate function.
    pub fn new(f: impl Fn(&EBook) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the constraint against one book.
    pub fn matches(&self, book: &EBook) -> bool {
        (*self.0)(book)
    }
}

/// Comparison operators for date-valued constraints. The book's date is the
/// left operand: `Ge` asks whether the book is on or after the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCmp {
    Eq,
    Ge,
    Le,
}

/// The constraint that matches nothing. Canonical result of an empty
/// combinator, and the fallback for unmatchable inputs.
pub fn always_false() -> Constraint {
    Constraint::new(|_| false)
}

/// The constraint that matches everything. Used for the open side of a
/// half-bounded date range.
pub fn always_true() -> Constraint {
    Constraint::new(|_| true)
}

/// Logical OR with short-circuit evaluation. Empty input yields
/// [`always_false`].
pub fn or(constraints: Vec<Constraint>) -> Constraint {
    if constraints.is_empty() {
        return always_false();
    }
    Constraint::new(move |book| constraints.iter().any(|c| c.matches(book)))
}

/// Logical AND with short-circuit evaluation. Empty input yields
/// [`always_false`].
pub fn and(constraints: Vec<Constraint>) -> Constraint {
    if constraints.is_empty() {
        return always_false();
    }
    Constraint::new(move |book| constraints.iter().all(|c| c.matches(book)))
}

/// An operator that combines a set of constraints, like AND or OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combiner {
    #[default]
    And,
    Or,
}

impl Combiner {
    /// Combines `constraints` under this operator.
    pub fn combine(&self, constraints: &[Constraint]) -> Constraint {
        let owned = constraints.to_vec();
        match self {
            Combiner::And => and(owned),
            Combiner::Or => or(owned),
        }
    }
}

fn agent_matches(pat: &Regex, agent: &Agent) -> bool {
    pat.is_match(&agent.name) || agent.aliases.iter().any(|a| pat.is_match(a))
}

/// Matches when any creator's name or alias matches the pattern.
pub(crate) fn match_creator(pat: Regex) -> Constraint {
    Constraint::new(move |book| {
        book.creators
            .iter()
            .filter_map(|id| book.agents.get(id))
            .any(|agent| agent_matches(&pat, agent))
    })
}

/// Matches when any illustrator's name or alias matches the pattern.
pub(crate) fn match_illustrator(pat: Regex) -> Constraint {
    Constraint::new(move |book| {
        book.illustrators
            .iter()
            .filter_map(|id| book.agents.get(id))
            .any(|agent| agent_matches(&pat, agent))
    })
}

/// Matches the pattern against the title.
pub(crate) fn match_title(pat: Regex) -> Constraint {
    Constraint::new(move |book| pat.is_match(&book.title))
}

/// Matches when any subject matches the pattern.
pub(crate) fn match_subject(pat: Regex) -> Constraint {
    Constraint::new(move |book| book.subjects.iter().any(|s| pat.is_match(s)))
}

/// Matches the pattern against the record type.
pub(crate) fn match_type(pat: Regex) -> Constraint {
    Constraint::new(move |book| pat.is_match(&book.book_type))
}

fn whole_word(value: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?is)\b{value}\b")).ok()
}

/// Wraps a field matcher with the word-index pre-filter.
///
/// The token set of `value` is computed once; books whose index does not
/// contain every token are rejected before the regex runs. Values that fail
/// to compile as a whole-word pattern match nothing.
pub(crate) fn test_words(value: &str, generate: fn(Regex) -> Constraint) -> Constraint {
    let Some(pat) = whole_word(value) else {
        return always_false();
    };
    let tokens = words(value);
    let inner = generate(pat);
    Constraint::new(move |book| {
        tokens.iter().all(|t| book.words.contains(t)) && inner.matches(book)
    })
}

/// Whole-word creator match with the word pre-filter.
pub(crate) fn test_creator(value: &str) -> Constraint {
    test_words(value, match_creator)
}

/// Whole-word illustrator match with the word pre-filter.
pub(crate) fn test_illustrator(value: &str) -> Constraint {
    test_words(value, match_illustrator)
}

/// Whole-word type match. The record type is not part of the word index, so
/// there is no pre-filter here.
pub(crate) fn test_type(value: &str) -> Constraint {
    match whole_word(value) {
        Some(pat) => match_type(pat),
        None => always_false(),
    }
}

/// Exact-string language membership. The value may list several acceptable
/// codes separated by periods (`en.fr`).
pub(crate) fn test_language(value: &str) -> Constraint {
    let codes: Vec<String> = value.split('.').map(str::to_string).collect();
    Constraint::new(move |book| codes.iter().any(|c| book.language == *c))
}

fn year_satisfies(book_date: &Date, year: i32, cmp: DateCmp) -> bool {
    let target = Date::from_year(year);
    match cmp {
        DateCmp::Eq => book_date.compare_to(&target) == Ordering::Equal,
        DateCmp::Ge => book_date.compare_to(&target) != Ordering::Less,
        DateCmp::Le => book_date.compare_to(&target) != Ordering::Greater,
    }
}

/// Compares the issued date against a target year. An empty value is the
/// open side of a range and matches everything.
pub(crate) fn test_issued(value: &str, cmp: DateCmp) -> Constraint {
    if value.is_empty() {
        return always_true();
    }
    let year: i32 = value.parse().unwrap_or(0);
    Constraint::new(move |book| year_satisfies(&book.issued, year, cmp))
}

/// Compares the copyright dates against a target year; any date satisfying
/// the comparison is a match. An empty value matches everything.
pub(crate) fn test_copyright(value: &str, cmp: DateCmp) -> Constraint {
    if value.is_empty() {
        return always_true();
    }
    let year: i32 = value.parse().unwrap_or(0);
    Constraint::new(move |book| {
        book.copyright_dates
            .iter()
            .any(|d| year_satisfies(d, year, cmp))
    })
}
