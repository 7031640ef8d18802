//! The RDF/XML → domain transformer.
//!
//! The upstream catalog is an RDF dialect, but this module treats it as a
//! fixed grammar: elements are matched by local name (the files use a
//! handful of namespace prefixes that carry no information we need), and
//! only the paths the domain model cares about are walked. Everything else
//! is skipped wholesale.
//!
//! The shape that matters, per `ebook` element:
//!
//! - `@about` — the book ID (likewise on `agent` and `file`)
//! - `creator>agent`, `ill>agent` — credited people
//! - `subject>Description>{value, memberOf@resource}` — kept only when the
//!   vocabulary URI ends in `LCSH`
//! - `language>Description>value`, `type>Description>value`
//! - `issued`, `marc260` (raw copyright text), `marc250` (edition)
//! - `hasFormat>file>{format>Description>value, extent, modified,
//!   isFormatOf@resource}`
//!
//! A file listing two formats where one is the ZIP sentinel is a zipped
//! variant of the other format; the sentinel moves into
//! [`Compression::Zip`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use bookshelf_core::{Agent, Compression, Date, EBook, PGFile, ZIP_FORMAT};

use crate::error::{IngestError, IngestResult};

/// An `ebook` element as read from the catalog, before filtering.
#[derive(Debug, Default)]
pub(crate) struct XmlEbook {
    pub id: String,
    pub publisher: String,
    pub title: String,
    pub table_of_contents: String,
    pub language: String,
    pub subjects: Vec<XmlSubject>,
    pub issued: String,
    pub downloads: u64,
    pub rights: String,
    pub copyright: String,
    pub edition: String,
    pub book_type: String,
    pub creators: Vec<XmlAgent>,
    pub illustrators: Vec<XmlAgent>,
    pub files: Vec<XmlFile>,
}

#[derive(Debug, Default)]
pub(crate) struct XmlSubject {
    pub value: String,
    pub member_of: String,
}

#[derive(Debug, Default)]
pub(crate) struct XmlAgent {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub birthdate: String,
    pub deathdate: String,
    pub webpages: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct XmlFile {
    pub about: String,
    pub formats: Vec<String>,
    pub extent: u64,
    pub modified: String,
    pub is_format_of: String,
}

impl XmlAgent {
    fn into_agent(self) -> Agent {
        Agent {
            id: self.id,
            name: self.name,
            aliases: self.aliases,
            birth_date: Date::parse(&self.birthdate).0,
            death_date: Date::parse(&self.deathdate).0,
            webpages: self.webpages,
        }
    }
}

impl XmlFile {
    pub(crate) fn into_file(self) -> PGFile {
        let (format, compression) = split_zip(&self.about, self.formats);
        PGFile {
            location: self.about,
            format,
            compression,
            file_size: self.extent,
            modified: Date::parse(&self.modified).0,
            book_id: self.is_format_of,
        }
    }
}

/// Splits the ZIP sentinel off a file's format list.
fn split_zip(location: &str, formats: Vec<String>) -> (String, Compression) {
    let mut base: Vec<String> = Vec::new();
    let mut zipped = false;
    for f in formats {
        if f == ZIP_FORMAT {
            zipped = true;
        } else {
            base.push(f);
        }
    }
    match (base.len(), zipped) {
        (0, false) => (String::new(), Compression::None),
        // A lone zip entry is a plain zip file, not a compressed variant.
        (0, true) => (ZIP_FORMAT.to_string(), Compression::None),
        (1, z) => (
            base.into_iter().next().unwrap_or_default(),
            if z { Compression::Zip } else { Compression::None },
        ),
        (_, z) => {
            tracing::warn!(
                location,
                formats = ?base,
                "file lists multiple base formats; keeping the first"
            );
            (
                base.into_iter().next().unwrap_or_default(),
                if z { Compression::Zip } else { Compression::None },
            )
        }
    }
}

impl XmlEbook {
    /// Converts into the domain book plus its unfiltered file list.
    ///
    /// Files come back separately because the loader filters them and drops
    /// the book entirely if none survive.
    pub(crate) fn into_parts(self) -> (EBook, Vec<XmlFile>) {
        let mut book = EBook {
            id: self.id,
            publisher: self.publisher,
            title: self.title,
            table_of_contents: self.table_of_contents,
            language: self.language,
            download_count: self.downloads,
            rights: self.rights,
            copyright_dates: Date::parse_all(&self.copyright),
            copyright: self.copyright,
            edition: self.edition,
            book_type: self.book_type,
            issued: Date::parse(&self.issued).0,
            ..Default::default()
        };
        for agent in self.creators {
            book.creators.push(agent.id.clone());
            book.agents.insert(agent.id.clone(), agent.into_agent());
        }
        for agent in self.illustrators {
            book.illustrators.push(agent.id.clone());
            book.agents.insert(agent.id.clone(), agent.into_agent());
        }
        for subject in self.subjects {
            if subject.member_of.ends_with("LCSH") {
                book.subjects.push(subject.value);
            }
        }
        book.extract_words();
        (book, self.files)
    }
}

fn local(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Returns the value of the attribute with the given local name, prefix
/// ignored (`rdf:about` and `about` are the same attribute to us).
fn attr_local(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local(a.key.as_ref()) == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Collects the text content of the current element, entity references
/// expanded, surrounding whitespace trimmed.
fn read_element_text(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<String> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(c.as_ref())),
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(text.trim().to_string())
}

/// Reads a `container>Description>value` nesting and returns the value
/// text. Used for `language`, `type`, and the per-file `format` elements.
fn read_nested_value(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<String> {
    let mut value = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if local(e.name().as_ref()) == b"value" => {
                value = read_element_text(reader, &e)?;
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(value)
}

fn parse_subject(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<XmlSubject> {
    let mut subject = XmlSubject::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local(e.name().as_ref()) {
                b"value" => subject.value = read_element_text(reader, &e)?,
                b"memberOf" => {
                    if let Some(r) = attr_local(&e, b"resource") {
                        subject.member_of = r;
                    }
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::Empty(e) if local(e.name().as_ref()) == b"memberOf" => {
                if let Some(r) = attr_local(&e, b"resource") {
                    subject.member_of = r;
                }
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(subject)
}

fn parse_agent(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<XmlAgent> {
    let mut agent = XmlAgent {
        id: attr_local(start, b"about").unwrap_or_default(),
        ..Default::default()
    };
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local(e.name().as_ref()) {
                b"name" => agent.name = read_element_text(reader, &e)?,
                b"alias" => {
                    let alias = read_element_text(reader, &e)?;
                    agent.aliases.push(alias);
                }
                b"birthdate" => agent.birthdate = read_element_text(reader, &e)?,
                b"deathdate" => agent.deathdate = read_element_text(reader, &e)?,
                b"webpage" => {
                    if let Some(r) = attr_local(&e, b"resource") {
                        agent.webpages.push(r);
                    }
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if local(e.name().as_ref()) == b"webpage" => {
                if let Some(r) = attr_local(&e, b"resource") {
                    agent.webpages.push(r);
                }
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(agent)
}

/// Parses a `creator` or `ill` container down to the agent inside it.
fn parse_agent_container(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
) -> IngestResult<Option<XmlAgent>> {
    let mut agent = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) if local(e.name().as_ref()) == b"agent" => {
                agent = Some(parse_agent(reader, &e)?);
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(agent)
}

fn parse_file(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<XmlFile> {
    let mut file = XmlFile {
        about: attr_local(start, b"about").unwrap_or_default(),
        ..Default::default()
    };
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local(e.name().as_ref()) {
                b"format" => {
                    let format = read_nested_value(reader, &e)?;
                    file.formats.push(format);
                }
                b"extent" => {
                    file.extent = read_element_text(reader, &e)?.parse().unwrap_or(0);
                }
                b"modified" => file.modified = read_element_text(reader, &e)?,
                b"isFormatOf" => {
                    if let Some(r) = attr_local(&e, b"resource") {
                        file.is_format_of = r;
                    }
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if local(e.name().as_ref()) == b"isFormatOf" => {
                if let Some(r) = attr_local(&e, b"resource") {
                    file.is_format_of = r;
                }
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(file)
}

fn parse_file_container(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
) -> IngestResult<Option<XmlFile>> {
    let mut file = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) if local(e.name().as_ref()) == b"file" => {
                file = Some(parse_file(reader, &e)?);
            }
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(file)
}

fn parse_ebook(reader: &mut Reader<&[u8]>, start: &BytesStart) -> IngestResult<XmlEbook> {
    let mut ebook = XmlEbook {
        id: attr_local(start, b"about").unwrap_or_default(),
        ..Default::default()
    };
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local(e.name().as_ref()) {
                b"publisher" => ebook.publisher = read_element_text(reader, &e)?,
                b"title" => ebook.title = read_element_text(reader, &e)?,
                b"tableOfContents" => ebook.table_of_contents = read_element_text(reader, &e)?,
                b"language" => ebook.language = read_nested_value(reader, &e)?,
                b"type" => ebook.book_type = read_nested_value(reader, &e)?,
                b"subject" => {
                    let subject = parse_subject(reader, &e)?;
                    ebook.subjects.push(subject);
                }
                b"issued" => ebook.issued = read_element_text(reader, &e)?,
                b"downloads" => {
                    ebook.downloads = read_element_text(reader, &e)?.parse().unwrap_or(0);
                }
                b"rights" => ebook.rights = read_element_text(reader, &e)?,
                b"marc260" => ebook.copyright = read_element_text(reader, &e)?,
                b"marc250" => ebook.edition = read_element_text(reader, &e)?,
                b"creator" => {
                    if let Some(agent) = parse_agent_container(reader, &e)? {
                        ebook.creators.push(agent);
                    }
                }
                b"ill" => {
                    if let Some(agent) = parse_agent_container(reader, &e)? {
                        ebook.illustrators.push(agent);
                    }
                }
                b"hasFormat" => {
                    if let Some(file) = parse_file_container(reader, &e)? {
                        ebook.files.push(file);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => return Err(IngestError::Truncated),
            _ => {}
        }
    }
    Ok(ebook)
}

/// Parses one catalog document and returns every `ebook` element in it.
pub(crate) fn parse_catalog(xml: &str) -> IngestResult<Vec<XmlEbook>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ebooks = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if local(e.name().as_ref()) == b"ebook" => {
                let ebook = parse_ebook(&mut reader, &e)?;
                ebooks.push(ebook);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ebooks)
}
