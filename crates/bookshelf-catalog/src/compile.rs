//! Compiles `(name, value)` query text into constraints.
//!
//! Constraint names select a field family and may carry leading flags:
//!
//! - `-` inverts the constraint — matched books are *excluded* from the
//!   results, and if a book is included by one constraint but excluded by
//!   another, the exclusion wins;
//! - `~` switches to glob mode, where the value is matched against the
//!   entire field.
//!
//! Both flags may appear on the same name in either order.
//!
//! Glob syntax: `.` means any single character and `_` means any number of
//! characters — like shell patterns, but with `?` and `*` replaced by
//! URL-safe characters. Matching is case-insensitive against the whole
//! field, so with creators Evelyn, Linda, Lynn and Eve: `Eve_` matches
//! Evelyn and Eve; `Eve` matches only Eve; `L.n_` matches Lynn and Linda;
//! `_l.n_` matches Linda, Evelyn and Lynn.
//!
//! Non-glob values are tested at word boundaries within the field (subject
//! "History - Fiction" matches `fiction` but not `story`).

use regex::Regex;

use crate::constraint::{
    Constraint, DateCmp, and, match_creator, match_illustrator, match_subject, match_title,
    match_type, or, test_copyright, test_creator, test_illustrator, test_issued, test_language,
    test_type, test_words,
};
use crate::error::{QueryError, QueryResult};

/// Builds an anchored case-insensitive regex from a glob expression:
/// `.` is kept as the any-character metacharacter and `_` becomes `.*`.
pub(crate) fn create_regex(value: &str) -> Result<Regex, regex::Error> {
    let glob = value.replace('_', ".*");
    Regex::new(&format!("(?is)^{glob}$"))
}

/// Splits a date constraint value into one (EQ) or two (GE/LE range)
/// year constraints. An empty range side matches everything.
fn date_constraint(
    value: &str,
    test: fn(&str, DateCmp) -> Constraint,
) -> QueryResult<Constraint> {
    let splits: Vec<&str> = value.split('-').collect();
    match splits.as_slice() {
        [single] => Ok(test(single, DateCmp::Eq)),
        [lo, hi] => Ok(and(vec![test(lo, DateCmp::Ge), test(hi, DateCmp::Le)])),
        _ => Err(QueryError::BadConstraint(format!("bad date range: {value}"))),
    }
}

/// Compiles a constraint from a name/value pair of query text.
///
/// Supported names (with their short aliases):
///
/// - `author`/`auth` — creator match
/// - `illustrator`/`ill` — illustrator match
/// - `creator`/`cre` — creator or illustrator
/// - `title` — title match
/// - `subject`/`subj` — subject match
/// - `topic`/`top` — title or subject
/// - `type`/`typ` — record type match
/// - `any` — creator, illustrator, title, or subject
/// - `language`/`lang` — exact language code; several codes may be
///   separated by periods (`en.fr`)
/// - `issued`/`iss`, `copyright`/`cop`/`copr` — a bare year, or a
///   `lo-hi` range with either end omissible
///
/// Returns the compiled constraint and whether it is an exclude constraint.
pub fn constraint_from_text(name: &str, value: &str) -> QueryResult<(Constraint, bool)> {
    let mut name = name.to_lowercase();
    let value = value.to_lowercase();

    let mut exclude = false;
    let mut use_glob = false;
    loop {
        if let Some(rest) = name.strip_prefix('-') {
            exclude = true;
            name = rest.to_string();
        } else if let Some(rest) = name.strip_prefix('~') {
            use_glob = true;
            name = rest.to_string();
        } else {
            break;
        }
    }

    let pat = if use_glob {
        Some(
            create_regex(&value)
                .map_err(|e| QueryError::BadConstraint(format!("bad pattern {value:?}: {e}")))?,
        )
    } else {
        None
    };

    let constraint = match name.as_str() {
        "author" | "auth" => match pat {
            Some(p) => match_creator(p),
            None => test_creator(&value),
        },
        "illustrator" | "ill" => match pat {
            Some(p) => match_illustrator(p),
            None => test_illustrator(&value),
        },
        "creator" | "cre" => match pat {
            Some(p) => or(vec![match_creator(p.clone()), match_illustrator(p)]),
            None => or(vec![test_creator(&value), test_illustrator(&value)]),
        },
        "title" => match pat {
            Some(p) => match_title(p),
            None => test_words(&value, match_title),
        },
        "subject" | "subj" => match pat {
            Some(p) => match_subject(p),
            None => test_words(&value, match_subject),
        },
        "topic" | "top" => match pat {
            Some(p) => or(vec![match_title(p.clone()), match_subject(p)]),
            None => or(vec![
                test_words(&value, match_title),
                test_words(&value, match_subject),
            ]),
        },
        "type" | "typ" => match pat {
            Some(p) => match_type(p),
            None => test_type(&value),
        },
        "any" => match pat {
            Some(p) => or(vec![
                match_creator(p.clone()),
                match_illustrator(p.clone()),
                match_title(p.clone()),
                match_subject(p),
            ]),
            None => or(vec![
                test_creator(&value),
                test_illustrator(&value),
                test_words(&value, match_title),
                test_words(&value, match_subject),
            ]),
        },
        "language" | "lang" => test_language(&value),
        "issued" | "iss" => date_constraint(&value, test_issued)?,
        "copyright" | "cop" | "copr" => date_constraint(&value, test_copyright)?,
        _ => {
            return Err(QueryError::BadConstraint(format!(
                "unknown constraint name: {name:?}"
            )));
        }
    };
    Ok((constraint, exclude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_books;

    fn ids(name: &str, value: &str) -> String {
        let (c, _) = constraint_from_text(name, value).unwrap();
        test_books()
            .iter()
            .filter(|b| c.matches(b))
            .map(|b| b.id.clone())
            .collect()
    }

    fn excluded(name: &str, value: &str) -> bool {
        constraint_from_text(name, value).unwrap().1
    }

    #[test]
    fn creator_is_whole_word() {
        // "Eve" is a whole word only for book e; "Evelyn" does not match.
        assert_eq!(ids("creator", "Eve"), "e");
    }

    #[test]
    fn creator_glob_spans_names() {
        assert_eq!(ids("~creator", "Eve_"), "ae");
    }

    #[test]
    fn creator_covers_illustrators_too() {
        assert_eq!(ids("creator", "lynda"), "w");
        assert_eq!(ids("author", "lynda"), "");
        assert_eq!(ids("illustrator", "lynda"), "w");
    }

    #[test]
    fn subject_case_insensitive() {
        assert_eq!(ids("subject", "fiction"), "hw");
        assert_eq!(ids("subject", "music"), "e");
        assert_eq!(ids("subject", "MUSIC"), "e");
        assert_eq!(ids("subj", "fiction"), "hw");
    }

    #[test]
    fn topic_is_title_or_subject() {
        // Whole-word matching: subject "Musical" is not a hit for "music",
        // so only e (subject "Music" and title "... Music Bible") matches.
        assert_eq!(ids("topic", "music"), "e");
        assert_eq!(ids("top", "bible"), "e");
        assert_eq!(ids("topic", "history"), "h");
    }

    #[test]
    fn any_spans_all_text_fields() {
        assert_eq!(ids("any", "gal"), "w");
        assert_eq!(ids("any", "hamilton"), "h");
        assert_eq!(ids("any", "eve"), "e");
    }

    #[test]
    fn language_lists() {
        assert_eq!(ids("language", "en"), "awe");
        assert_eq!(ids("lang", "en.rap"), "ahwe");
    }

    #[test]
    fn issued_year_and_ranges() {
        assert_eq!(ids("issued", "2005"), "a");
        assert_eq!(ids("issued", "1980-"), "ahwe");
        assert_eq!(ids("issued", "-1980"), "");
        assert_eq!(ids("issued", "2016-"), "hw");
        assert_eq!(ids("issued", "1998-2005"), "ae");
        assert_eq!(ids("iss", "2016-2017"), "h");
    }

    #[test]
    fn exclude_flag() {
        assert!(excluded("-title", "bible"));
        assert!(!excluded("title", "bible"));
        // Flags compose in either order.
        assert!(excluded("-~title", "b_"));
        assert!(excluded("~-title", "b_"));
        assert_eq!(ids("-~title", "_bible_"), "e");
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(matches!(
            constraint_from_text("publisher", "gutenberg"),
            Err(QueryError::BadConstraint(_))
        ));
    }

    #[test]
    fn bad_glob_rejected() {
        assert!(matches!(
            constraint_from_text("~title", "(unclosed"),
            Err(QueryError::BadConstraint(_))
        ));
    }

    #[test]
    fn overlong_date_range_rejected() {
        assert!(matches!(
            constraint_from_text("issued", "1900-1950-2000"),
            Err(QueryError::BadConstraint(_))
        ));
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(ids("Creator", "Eve"), "e");
        assert_eq!(ids("SUBJECT", "Fiction"), "hw");
    }
}
