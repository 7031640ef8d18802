//! Error types for the ingest pipeline.
//!
//! The taxonomy matters more than the variants: transient network failures
//! never surface here (the fetcher retries them forever), a local-file open
//! failure is fatal (local paths exist for testing only), and decode
//! failures kill at most one refresh attempt — the previous dataset stays
//! live and the next tick retries.

use thiserror::Error;

/// Result type alias for ingest operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur while acquiring or decoding the catalog archive.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A local source path could not be opened. Fatal: local paths are a
    /// test-mode convenience and there is nothing to retry.
    #[error("couldn't open local source {path}: {source}")]
    LocalOpen {
        path: String,
        source: std::io::Error,
    },

    /// Reading the (possibly decompressed) stream failed partway through.
    #[error("archive read error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML could not be decoded.
    #[error("xml decode error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document ended inside an open element.
    #[error("truncated document")]
    Truncated,
}
