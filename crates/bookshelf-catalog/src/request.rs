//! Translates flat HTTP query parameters into a [`ConstraintSpec`].
//!
//! This is the single boundary where request input becomes typed query
//! machinery; everything it rejects surfaces as a bad-request error and
//! never reaches the store.

use crate::compile::constraint_from_text;
use crate::constraint::{Combiner, and};
use crate::error::{QueryError, QueryResult};
use crate::spec::ConstraintSpec;

use bookshelf_core::words;

/// Whether a constraint key's value is a word search. Language lists
/// (`en.fr`) and date ranges (`1980-`) have structure the word extractor
/// would destroy, so those families pass through whole.
fn splits_into_words(key: &str) -> bool {
    let bare = key.trim_start_matches(['-', '~']);
    !matches!(
        bare,
        "language" | "lang" | "issued" | "iss" | "copyright" | "cop" | "copr"
    )
}

/// Builds a constraint spec from `(key, value)` query parameters.
///
/// Recognized keys: `or` / `and` select the include combiner, `-or` /
/// `-and` the exclude combiner; `limit`/`lim` (bounded by `max_limit`),
/// `page`/`pg`, and `random`/`rand` shape the result. Every other key is
/// compiled as a constraint name.
///
/// Multi-word values search for all the words: each word compiles
/// separately and the results combine with AND. A value with no words at
/// all is a bad request.
pub fn constraint_spec_from_params<'a>(
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
    max_limit: usize,
) -> QueryResult<ConstraintSpec> {
    let mut spec = ConstraintSpec::default();

    for (key, value) in params {
        match key {
            "or" => spec.include_combiner = Combiner::Or,
            "and" => spec.include_combiner = Combiner::And,
            "-or" => spec.exclude_combiner = Combiner::Or,
            "-and" => spec.exclude_combiner = Combiner::And,
            "limit" | "lim" => {
                let n: usize = value.parse().unwrap_or(0);
                if n == 0 || n > max_limit {
                    return Err(QueryError::BadLimit(max_limit));
                }
                spec.limit = n;
            }
            "page" | "pg" => {
                spec.page = value.parse().map_err(|_| QueryError::BadPage)?;
            }
            "random" | "rand" => spec.random = true,
            _ => {
                let (constraint, exclude) = if splits_into_words(key) {
                    let tokens = words(value);
                    match tokens.as_slice() {
                        [] => return Err(QueryError::EmptySearch(value.to_string())),
                        [word] => constraint_from_text(key, word)?,
                        many => {
                            let mut exclude = false;
                            let mut parts = Vec::with_capacity(many.len());
                            for word in many {
                                let (c, ex) = constraint_from_text(key, word)?;
                                parts.push(c);
                                exclude |= ex;
                            }
                            (and(parts), exclude)
                        }
                    }
                } else {
                    constraint_from_text(key, value)?
                };
                if exclude {
                    spec.excludes.push(constraint);
                } else {
                    spec.includes.push(constraint);
                }
            }
        }
    }
    Ok(spec)
}
