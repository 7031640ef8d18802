//! Shared fixtures for the crate's unit tests.

use bookshelf_core::{Agent, Date, EBook, PGFile};

fn agent(id: &str, name: &str) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn book(
    id: &str,
    title: &str,
    creators: &[(&str, &str)],
    illustrators: &[(&str, &str)],
    language: &str,
    subjects: &[&str],
    issued: Date,
) -> EBook {
    let mut builder = EBook::builder()
        .id(id)
        .title(title)
        .language(language)
        .issued(issued)
        .file(PGFile {
            format: "text/plain".into(),
            ..Default::default()
        });
    for (aid, name) in creators {
        builder = builder.creator(agent(aid, name));
    }
    for (aid, name) in illustrators {
        builder = builder.illustrator(agent(aid, name));
    }
    for subject in subjects {
        builder = builder.subject(*subject);
    }
    builder.build()
}

/// The four-book dataset exercised throughout the query tests.
pub(crate) fn test_books() -> Vec<EBook> {
    vec![
        book(
            "a",
            "Evelyn's Story",
            &[("agents/ev", "Evelyn Excellent")],
            &[],
            "en",
            &["Biography"],
            Date::from_ymd(2005, 7, 18),
        ),
        book(
            "h",
            "Hamilton",
            &[("agents/lmm", "Lin-Manuel Miranda")],
            &[],
            "rap",
            &["History - Fiction", "History - Play", "Musical"],
            Date::from_ymd(2016, 12, 25),
        ),
        book(
            "w",
            "Wonder Women Play Through the Ages",
            &[],
            &[("agents/lc", "Lynda Carter"), ("agents/gg", "Gal Gadot")],
            "en",
            &["Comics -- Fiction"],
            Date::from_ymd(2018, 10, 10),
        ),
        book(
            "e",
            "The Woman's Music Bible",
            &[("agents/eve", "Eve")],
            &[],
            "en",
            &["Music", "Religion"],
            Date::from_ymd(1998, 1, 1),
        ),
    ]
}
