//! The catalog loader: a pure transformer from an XML byte stream to a
//! vector of filtered books.
//!
//! Input is either a single document holding one or more `ebook` elements,
//! or a tar archive whose members are individually such documents. The
//! loader applies its filters while converting, so the caller only ever
//! sees books worth storing. It never touches the catalog store.
//!
//! Tar members that fail to decode are skipped with a diagnostic; an I/O
//! error reading the archive itself kills the whole attempt (the refresher
//! retries on its next tick).

use std::io::Read;

use bookshelf_core::{EBook, PGFile};

use crate::error::IngestResult;
use crate::filters::{EBookFilter, PGFileFilter};
use crate::rdf::{self, XmlEbook, XmlFile};

/// Loads catalog data with configurable ingest-time filters and a cap on
/// how much to keep.
///
/// With no ebook filters configured, every book passes; with no file
/// filters, every file passes. A cap of zero means unlimited.
#[derive(Default)]
pub struct Loader {
    ebook_filters: Vec<EBookFilter>,
    file_filters: Vec<PGFileFilter>,
    load_at_most: usize,
}

impl Loader {
    /// Creates a loader that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a book filter; all filters must pass for a book to be kept.
    pub fn with_ebook_filter(mut self, filter: EBookFilter) -> Self {
        self.ebook_filters.push(filter);
        self
    }

    /// Adds a file filter; all filters must pass for a file to be kept.
    pub fn with_file_filter(mut self, filter: PGFileFilter) -> Self {
        self.file_filters.push(filter);
        self
    }

    /// Stops loading once `n` books have been kept. Mainly useful for
    /// testing and debugging without waiting for the full archive.
    pub fn load_at_most(mut self, n: usize) -> Self {
        self.load_at_most = n;
        self
    }

    fn at_cap(&self, kept: usize) -> bool {
        self.load_at_most > 0 && kept >= self.load_at_most
    }

    /// Filters parsed ebooks into `out`, dropping books that fail a filter
    /// or end up with no files.
    fn keep(&self, parsed: Vec<XmlEbook>, out: &mut Vec<EBook>) {
        for xml_book in parsed {
            if self.at_cap(out.len()) {
                return;
            }
            let (mut book, files) = xml_book.into_parts();
            if !self.ebook_filters.iter().all(|f| f(&book)) {
                continue;
            }
            let surviving: Vec<PGFile> = files
                .into_iter()
                .map(XmlFile::into_file)
                .filter(|f| self.file_filters.iter().all(|filt| filt(f)))
                .collect();
            // Only store books we have at least one usable file for.
            if surviving.is_empty() {
                continue;
            }
            book.files = surviving;
            out.push(book);
        }
    }

    /// Loads a single XML document. Returns the kept books and the number
    /// of documents processed (always 1).
    pub fn load_one<R: Read>(&self, mut reader: R) -> IngestResult<(Vec<EBook>, usize)> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let xml = String::from_utf8_lossy(&buf);
        let parsed = rdf::parse_catalog(&xml)?;

        let mut books = Vec::new();
        self.keep(parsed, &mut books);
        Ok((books, 1))
    }

    /// Loads a tar archive of XML documents. Returns the kept books and
    /// the number of members processed.
    ///
    /// A member that fails to decode is skipped with a warning; the rest of
    /// the archive still loads.
    pub fn load_tar<R: Read>(&self, reader: R) -> IngestResult<(Vec<EBook>, usize)> {
        let mut archive = tar::Archive::new(reader);
        let mut books = Vec::new();
        let mut members = 0usize;

        for entry in archive.entries()? {
            let mut entry = entry?;
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            members += 1;

            let xml = String::from_utf8_lossy(&buf);
            match rdf::parse_catalog(&xml) {
                Ok(parsed) => self.keep(parsed, &mut books),
                Err(e) => {
                    let member = entry.path().map(|p| p.display().to_string()).ok();
                    tracing::warn!(member, error = %e, "skipping undecodable catalog member");
                }
            }
            if self.at_cap(books.len()) {
                break;
            }
        }
        Ok((books, members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{content_filter, language_filter};

    fn ebook_xml(id: &str, title: &str, language: &str, formats: &[&str]) -> String {
        let files: String = formats
            .iter()
            .enumerate()
            .map(|(i, f)| {
                format!(
                    r#"<hasFormat><file about="files/{id}/{i}">
                         <format><Description><value>{f}</value></Description></format>
                         <extent>100</extent>
                         <isFormatOf resource="{id}"/>
                       </file></hasFormat>"#
                )
            })
            .collect();
        format!(
            r#"<ebook about="{id}">
                 <title>{title}</title>
                 <language><Description><value>{language}</value></Description></language>
                 {files}
               </ebook>"#
        )
    }

    fn catalog_xml(ebooks: &[String]) -> String {
        format!("<RDF>{}</RDF>", ebooks.concat())
    }

    fn four_book_catalog() -> String {
        catalog_xml(&[
            ebook_xml("ebooks/1", "First", "en", &["text/plain"]),
            ebook_xml("ebooks/2", "Second", "fr", &["text/plain"]),
            ebook_xml("ebooks/3", "Third", "en", &["audio/ogg"]),
            ebook_xml("ebooks/4", "Fourth", "en", &["text/plain", "audio/ogg"]),
        ])
    }

    fn tar_of(members: &[String]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (i, m) in members.iter().enumerate() {
            let mut header = tar::Header::new_gnu();
            header.set_size(m.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(
                    &mut header,
                    format!("cache/epub/{i}/pg{i}.rdf"),
                    m.as_bytes(),
                )
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn ids(books: &[EBook]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn no_filters_keeps_everything() {
        let loader = Loader::new();
        let (books, n) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            ids(&books),
            ["ebooks/1", "ebooks/2", "ebooks/3", "ebooks/4"]
        );
    }

    #[test]
    fn language_filter_drops_books() {
        let loader = Loader::new().with_ebook_filter(language_filter(vec!["en".into()]));
        let (books, _) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/3", "ebooks/4"]);
    }

    #[test]
    fn file_filter_drops_files_then_empty_books() {
        let loader = Loader::new().with_file_filter(content_filter(vec!["plain".into()]));
        let (books, _) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        // Book 3 only has an audio file and is dropped entirely; book 4
        // keeps just its text file.
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/2", "ebooks/4"]);
        let fourth = &books[2];
        assert_eq!(fourth.files.len(), 1);
        assert_eq!(fourth.files[0].format, "text/plain");
    }

    #[test]
    fn combined_filters() {
        let loader = Loader::new()
            .with_ebook_filter(language_filter(vec!["en".into()]))
            .with_file_filter(content_filter(vec!["plain".into()]));
        let (books, _) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/4"]);
        for book in &books {
            assert!(!book.files.is_empty());
        }
    }

    #[test]
    fn load_cap_stops_early() {
        let loader = Loader::new().load_at_most(2);
        let (books, _) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/2"]);
    }

    #[test]
    fn malformed_single_document_fails() {
        let loader = Loader::new();
        assert!(loader.load_one("<RDF><ebook".as_bytes()).is_err());
    }

    #[test]
    fn tar_loads_all_members() {
        let members = vec![
            catalog_xml(&[ebook_xml("ebooks/1", "First", "en", &["text/plain"])]),
            catalog_xml(&[ebook_xml("ebooks/2", "Second", "en", &["text/plain"])]),
        ];
        let loader = Loader::new();
        let (books, n) = loader.load_tar(tar_of(&members).as_slice()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/2"]);
    }

    #[test]
    fn tar_skips_malformed_members() {
        let members = vec![
            catalog_xml(&[ebook_xml("ebooks/1", "First", "en", &["text/plain"])]),
            "<RDF><ebook about='broken'".to_string(),
            catalog_xml(&[ebook_xml("ebooks/3", "Third", "en", &["text/plain"])]),
        ];
        let loader = Loader::new();
        let (books, n) = loader.load_tar(tar_of(&members).as_slice()).unwrap();
        assert_eq!(n, 3, "every member is processed");
        assert_eq!(ids(&books), ["ebooks/1", "ebooks/3"]);
    }

    #[test]
    fn tar_honors_load_cap() {
        let members: Vec<String> = (0..5)
            .map(|i| {
                catalog_xml(&[ebook_xml(
                    &format!("ebooks/{i}"),
                    "Title",
                    "en",
                    &["text/plain"],
                )])
            })
            .collect();
        let loader = Loader::new().load_at_most(2);
        let (books, n) = loader.load_tar(tar_of(&members).as_slice()).unwrap();
        assert_eq!(books.len(), 2);
        assert!(n < 5, "stopped before the end of the archive");
    }

    #[test]
    fn loaded_books_have_word_indexes() {
        let loader = Loader::new();
        let (books, _) = loader.load_one(four_book_catalog().as_bytes()).unwrap();
        assert!(books[0].words.contains("first"));
        assert!(books[3].words.contains("fourth"));
    }
}
