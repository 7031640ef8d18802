//! The catalog domain model: books, the people credited on them, and their
//! downloadable files.
//!
//! An [`EBook`] owns everything it references: its files, and a private map
//! of the agents named in its creator/illustrator lists. There is no agent
//! sharing across books, so a book is a self-contained value that can be
//! cloned, serialized, and swapped wholesale.
//!
//! The word index ([`EBook::words`]) is derived data: it is rebuilt by
//! [`EBook::extract_words`] when the book is assembled and never mutated
//! afterward.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::date::Date;
use crate::words::words;

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// The MIME type the source uses to mark a zipped variant of a file.
pub const ZIP_FORMAT: &str = "application/zip";

/// Whether a downloadable file is stored zipped at the source.
///
/// The source data models a zipped variant as a second entry in the file's
/// format list; ingest splits that sentinel off into this enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Zip,
}

/// A single downloadable variant of a book: one format at one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PGFile {
    /// URI of the downloadable file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// MIME-like content type of the (possibly unzipped) content.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Whether the file is stored zipped.
    pub compression: Compression,
    /// Size in bytes.
    #[serde(rename = "filesize", skip_serializing_if = "is_zero")]
    pub file_size: u64,
    /// Last modification date at the source.
    #[serde(skip_serializing_if = "Date::is_zero")]
    pub modified: Date,
    /// URI of the book this file belongs to.
    #[serde(rename = "bookid", skip_serializing_if = "String::is_empty")]
    pub book_id: String,
}

/// A person credited on a book: author, editor, or illustrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    /// URI identifying the agent within the source catalog.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Date::is_zero")]
    pub birth_date: Date,
    #[serde(skip_serializing_if = "Date::is_zero")]
    pub death_date: Date,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub webpages: Vec<String>,
}

impl Agent {
    /// Adds the words of the agent's name and aliases to `set`.
    pub fn add_words(&self, set: &mut HashSet<String>) {
        set.extend(words(&self.name));
        for alias in &self.aliases {
            set.extend(words(alias));
        }
    }
}

/// One catalog record: bibliographic metadata plus one or more downloadable
/// file descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EBook {
    /// URI identifying the book within the source catalog.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Agent IDs credited as creators; each resolves through [`Self::agents`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<String>,
    /// Agent IDs credited as illustrators; each resolves through
    /// [`Self::agents`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub illustrators: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub table_of_contents: String,
    /// ISO language code.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Date::is_zero")]
    pub issued: Date,
    #[serde(skip_serializing_if = "is_zero")]
    pub download_count: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rights: String,
    /// Raw copyright text as it appears in the source.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub edition: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub book_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PGFile>,
    /// Every agent referenced by [`Self::creators`] or [`Self::illustrators`].
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub agents: HashMap<String, Agent>,
    /// Dates scraped out of the raw copyright text.
    #[serde(skip)]
    pub copyright_dates: Vec<Date>,
    /// Word index over title, subjects, and agent names/aliases.
    #[serde(skip)]
    pub words: HashSet<String>,
}

impl EBook {
    /// Rebuilds the word index from the title, subjects, and every agent's
    /// name and aliases.
    ///
    /// Call this once when the book is fully assembled; the index is treated
    /// as immutable from then on.
    pub fn extract_words(&mut self) {
        let mut set: HashSet<String> = words(&self.title).into_iter().collect();
        for subject in &self.subjects {
            set.extend(words(subject));
        }
        for agent in self.agents.values() {
            agent.add_words(&mut set);
        }
        self.words = set;
    }

    /// Resolves the creator IDs to their agent records, for rendering.
    pub fn full_creators(&self) -> Vec<&Agent> {
        self.creators
            .iter()
            .filter_map(|id| self.agents.get(id))
            .collect()
    }

    /// Starts building a book.
    pub fn builder() -> EBookBuilder {
        EBookBuilder::default()
    }
}

/// Builder for constructing EBook instances.
///
/// Keeps the model's invariants without ceremony: credited agents land in
/// both the ID list and the agent map, copyright dates are parsed out of
/// the raw text, and the word index is built exactly once at
/// [`EBookBuilder::build`].
#[derive(Debug, Default)]
pub struct EBookBuilder {
    book: EBook,
}

impl EBookBuilder {
    /// Sets the book ID.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.book.id = id.into();
        self
    }

    /// Sets the publisher.
    #[must_use]
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.book.publisher = publisher.into();
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.book.title = title.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.book.language = language.into();
        self
    }

    /// Adds a subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.book.subjects.push(subject.into());
        self
    }

    /// Adds a creator, recording the agent and referencing it by ID.
    #[must_use]
    pub fn creator(mut self, agent: Agent) -> Self {
        self.book.creators.push(agent.id.clone());
        self.book.agents.insert(agent.id.clone(), agent);
        self
    }

    /// Adds an illustrator, recording the agent and referencing it by ID.
    #[must_use]
    pub fn illustrator(mut self, agent: Agent) -> Self {
        self.book.illustrators.push(agent.id.clone());
        self.book.agents.insert(agent.id.clone(), agent);
        self
    }

    /// Sets the issued date.
    #[must_use]
    pub fn issued(mut self, issued: Date) -> Self {
        self.book.issued = issued;
        self
    }

    /// Sets the download count.
    #[must_use]
    pub fn download_count(mut self, count: u64) -> Self {
        self.book.download_count = count;
        self
    }

    /// Sets the rights statement.
    #[must_use]
    pub fn rights(mut self, rights: impl Into<String>) -> Self {
        self.book.rights = rights.into();
        self
    }

    /// Sets the raw copyright text; its dates are parsed at build time.
    #[must_use]
    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.book.copyright = copyright.into();
        self
    }

    /// Sets the edition.
    #[must_use]
    pub fn edition(mut self, edition: impl Into<String>) -> Self {
        self.book.edition = edition.into();
        self
    }

    /// Sets the record type.
    #[must_use]
    pub fn book_type(mut self, book_type: impl Into<String>) -> Self {
        self.book.book_type = book_type.into();
        self
    }

    /// Adds a downloadable file.
    #[must_use]
    pub fn file(mut self, file: PGFile) -> Self {
        self.book.files.push(file);
        self
    }

    /// Builds the book: parses copyright dates and extracts the word index.
    pub fn build(mut self) -> EBook {
        self.book.copyright_dates = Date::parse_all(&self.book.copyright);
        self.book.extract_words();
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> EBook {
        let agent = Agent {
            id: "agents/1".into(),
            name: "Evelyn Excellent".into(),
            aliases: vec!["E. E.".into()],
            ..Default::default()
        };
        let mut book = EBook {
            id: "ebooks/1".into(),
            title: "Evelyn's Story".into(),
            language: "en".into(),
            subjects: vec!["Biography".into()],
            creators: vec![agent.id.clone()],
            agents: HashMap::from([(agent.id.clone(), agent)]),
            issued: Date::from_ymd(2005, 7, 18),
            files: vec![PGFile {
                location: "files/1.txt".into(),
                format: "text/plain".into(),
                file_size: 1024,
                book_id: "ebooks/1".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        book.extract_words();
        book
    }

    #[test]
    fn extract_words_unions_title_subjects_agents() {
        let book = sample_book();
        for w in ["evelyn", "s", "story", "biography", "excellent", "e"] {
            assert!(book.words.contains(w), "missing word {w:?}");
        }
        assert!(!book.words.contains("en"), "language is not indexed");
    }

    #[test]
    fn extract_words_is_exactly_the_defined_union() {
        let book = sample_book();
        let mut expected: HashSet<String> = words(&book.title).into_iter().collect();
        for s in &book.subjects {
            expected.extend(words(s));
        }
        for a in book.agents.values() {
            expected.extend(words(&a.name));
            for alias in &a.aliases {
                expected.extend(words(alias));
            }
        }
        assert_eq!(book.words, expected);
    }

    #[test]
    fn full_creators_resolves_ids() {
        let book = sample_book();
        let creators = book.full_creators();
        assert_eq!(creators.len(), 1);
        assert_eq!(creators[0].name, "Evelyn Excellent");
    }

    #[test]
    fn serialization_omits_empty_fields() {
        let book = sample_book();
        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"id\":\"ebooks/1\""));
        assert!(json.contains("\"issued\":\"2005-07-18\""));
        // Unset scalar fields and the derived index stay off the wire.
        assert!(!json.contains("publisher"));
        assert!(!json.contains("words"));
        assert!(!json.contains("copyright_dates"));
    }

    #[test]
    fn file_serializes_compression() {
        let file = PGFile {
            format: "text/plain".into(),
            compression: Compression::Zip,
            ..Default::default()
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"compression\":\"zip\""));
    }

    #[test]
    fn deserialize_skips_derived_fields() {
        let json = r#"{"id":"ebooks/2","title":"Hamilton","language":"rap"}"#;
        let book: EBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, "ebooks/2");
        assert!(book.words.is_empty());
        assert!(book.copyright_dates.is_empty());
    }

    #[test]
    fn builder_keeps_agent_invariant() {
        let book = EBook::builder()
            .id("ebooks/7")
            .title("Collected Sketches")
            .creator(Agent {
                id: "agents/a".into(),
                name: "Ann Author".into(),
                ..Default::default()
            })
            .illustrator(Agent {
                id: "agents/i".into(),
                name: "Ira Inker".into(),
                ..Default::default()
            })
            .file(PGFile::default())
            .build();

        for id in book.creators.iter().chain(book.illustrators.iter()) {
            assert!(book.agents.contains_key(id), "agent {id} missing from map");
        }
        assert!(book.words.contains("inker"));
    }

    #[test]
    fn builder_parses_copyright_dates() {
        let book = EBook::builder()
            .title("Old Verse")
            .copyright("New York: Verse House, 1919, renewed 1946.")
            .build();
        assert_eq!(
            book.copyright_dates,
            vec![Date::from_year(1919), Date::from_year(1946)]
        );
    }
}
