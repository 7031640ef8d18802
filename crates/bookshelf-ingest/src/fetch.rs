//! Acquiring the catalog archive and keeping it fresh.
//!
//! [`run`] is the refresh task: it fetches the configured source, hands the
//! bytes to the loader on a blocking worker, swaps the result into the
//! catalog, and sleeps until one interval after the fetch succeeded. The
//! deadline is taken the moment the fetch completes, so a slow or failed
//! decode never stalls the schedule and refreshes never overlap.
//!
//! HTTP sources are retried forever with exponential backoff — the service
//! can start before its data source is reachable. Local paths are a
//! test-mode convenience: if one fails to open it will fail forever, so
//! that error is fatal.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;

use bookshelf_catalog::Catalog;
use bookshelf_core::EBook;

use crate::error::{IngestError, IngestResult};
use crate::filters::{content_filter, language_filter};
use crate::loader::Loader;

/// What to fetch, how often, and what to keep.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Source of the catalog archive: an `http(s)` URL, or a local path
    /// (testing only).
    pub url: String,
    /// Time between refreshes, measured from each successful fetch.
    pub interval: Duration,
    /// Language allow-list applied at ingest.
    pub languages: Vec<String>,
    /// Format allow-list (friendly names) applied at ingest.
    pub formats: Vec<String>,
    /// Keep at most this many books; zero means unlimited.
    pub load_at_most: usize,
}

fn build_loader(config: &RefreshConfig) -> Loader {
    Loader::new()
        .with_ebook_filter(language_filter(config.languages.clone()))
        .with_file_filter(content_filter(config.formats.clone()))
        .load_at_most(config.load_at_most)
}

/// Fetches the raw archive bytes.
///
/// HTTP transport errors, non-2xx statuses, and interrupted downloads all
/// retry with a doubling delay starting at one second, indefinitely. Only
/// a local-path open failure returns an error.
async fn acquire(url: &str) -> IngestResult<Vec<u8>> {
    if url.starts_with("http") {
        let mut retry = Duration::from_secs(1);
        loop {
            match reqwest::get(url).await {
                Ok(resp) if resp.status().is_success() => {
                    let status = resp.status();
                    match resp.bytes().await {
                        Ok(body) => {
                            tracing::info!(%status, url, bytes = body.len(), "fetched catalog archive");
                            return Ok(body.to_vec());
                        }
                        Err(e) => tracing::warn!(error = %e, url, "catalog download interrupted"),
                    }
                }
                Ok(resp) => {
                    tracing::warn!(status = %resp.status(), url, "unexpected status fetching catalog")
                }
                Err(e) => tracing::warn!(error = %e, url, "couldn't fetch catalog"),
            }
            tracing::info!(retry_in = ?retry, "will retry catalog fetch");
            tokio::time::sleep(retry).await;
            retry *= 2;
        }
    }

    tokio::fs::read(url)
        .await
        .map_err(|source| IngestError::LocalOpen {
            path: url.to_string(),
            source,
        })
}

/// Decompresses by source-name suffix (`.bz2`, then `.gz`) and loads in
/// tar mode when a `.tar` suffix remains, single-document mode otherwise.
pub(crate) fn decode_and_load(
    source: &str,
    bytes: Vec<u8>,
    loader: &Loader,
) -> IngestResult<(Vec<EBook>, usize)> {
    let mut name = source;
    let mut reader: Box<dyn Read> = Box::new(Cursor::new(bytes));

    if let Some(stripped) = name.strip_suffix(".bz2") {
        reader = Box::new(BzDecoder::new(reader));
        name = stripped;
    }
    if let Some(stripped) = name.strip_suffix(".gz") {
        reader = Box::new(GzDecoder::new(reader));
        name = stripped;
    }

    if name.ends_with(".tar") {
        loader.load_tar(reader)
    } else {
        loader.load_one(reader)
    }
}

/// The refresh loop. Runs until the process shuts down.
pub async fn run(config: RefreshConfig, catalog: Arc<Catalog>) {
    loop {
        tracing::info!(url = %config.url, "beginning book loading");
        let bytes = match acquire(&config.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                // Local paths exist for testing; retrying cannot help.
                tracing::error!(error = %e, "catalog source unavailable");
                std::process::exit(1);
            }
        };

        // Schedule the next refresh from this moment, before decoding, so
        // a decode failure costs one tick and not the whole loop.
        let next_refresh = tokio::time::Instant::now() + config.interval;

        let url = config.url.clone();
        let loader = build_loader(&config);
        let started = std::time::Instant::now();
        let outcome =
            tokio::task::spawn_blocking(move || decode_and_load(&url, bytes, &loader)).await;

        match outcome {
            Ok(Ok((books, sources))) if sources > 0 => {
                tracing::info!(
                    sources,
                    books = books.len(),
                    elapsed = ?started.elapsed(),
                    "book loading complete"
                );
                catalog.update(books);
            }
            Ok(Ok(_)) => {
                tracing::warn!("catalog archive contained no documents; keeping previous dataset")
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "catalog decode failed; keeping previous dataset")
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog decode task failed; keeping previous dataset")
            }
        }

        tokio::time::sleep_until(next_refresh).await;
    }
}
