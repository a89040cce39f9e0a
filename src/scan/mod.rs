//! Export tree scanning and per-file download dispatch.
//!
//! The scanner walks the source directory depth-first in listing order. Every
//! entry with a `.json` extension is decoded as an export file; its attachment
//! URLs are handed to the batch downloader, and the walk resumes only after
//! that file's batch has settled. Unreadable or undecodable entries are
//! skipped; only an unreadable source root is fatal.

mod export;

pub use export::{ExportError, FileEntry, Message, attachment_urls, read_export_file};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

use crate::download::{BatchDownloader, HttpClient};
use crate::store::FileStore;

/// Errors that can occur when scanning an export tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not read source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Aggregate outcome of one scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanSummary {
    /// Export files that decoded successfully.
    pub files_parsed: usize,
    /// Attachment URLs collected across all parsed files.
    pub urls_found: usize,
    /// Downloads that finished with a file on disk.
    pub completed: usize,
    /// Downloads that were attempted and failed.
    pub failed: usize,
}

/// Walks an export tree and downloads the attachments it references.
#[derive(Debug)]
pub struct ExportScanner {
    client: HttpClient,
    store: Arc<FileStore>,
    batch: BatchDownloader,
}

impl ExportScanner {
    /// Creates a scanner that saves through `store` and downloads through
    /// `client`, one batch per export file.
    #[must_use]
    pub fn new(client: HttpClient, store: Arc<FileStore>, batch: BatchDownloader) -> Self {
        Self {
            client,
            store,
            batch,
        }
    }

    /// Scans `src` recursively, downloading attachments file by file.
    ///
    /// Export files are processed one at a time; within a file, downloads
    /// run concurrently up to the configured bound.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ReadDir`] when `src` cannot be listed, which
    /// covers a missing path and a path that is not a directory. Everything
    /// below the root is skipped on error instead.
    #[instrument(skip(self), fields(src = %src.display()))]
    pub async fn scan(&self, src: &Path) -> Result<ScanSummary, ScanError> {
        let entries = fs::read_dir(src).await.map_err(|source| ScanError::ReadDir {
            path: src.to_path_buf(),
            source,
        })?;

        let mut summary = ScanSummary::default();
        self.visit_entries(entries, &mut summary).await;
        Ok(summary)
    }

    /// Visits one directory's entries in listing order.
    ///
    /// Directories are descended into before the entry itself is offered to
    /// the export parser. A directory named `something.json` reaches the
    /// parser too and is skipped there when reading it fails.
    fn visit_entries<'a>(
        &'a self,
        mut entries: fs::ReadDir,
        summary: &'a mut ScanSummary,
    ) -> BoxFuture<'a, ()> {
        async move {
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        debug!(error = %e, "stopping directory listing early");
                        break;
                    }
                };

                let path = entry.path();
                let is_dir = match entry.file_type().await {
                    Ok(file_type) => file_type.is_dir(),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                        continue;
                    }
                };

                if is_dir {
                    match fs::read_dir(&path).await {
                        Ok(children) => self.visit_entries(children, &mut *summary).await,
                        Err(e) => {
                            debug!(path = %path.display(), error = %e, "skipping unreadable directory");
                        }
                    }
                }

                self.process_path(&path, summary).await;
            }
        }
        .boxed()
    }

    /// Decodes one candidate export file and runs its download batch.
    async fn process_path(&self, path: &Path, summary: &mut ScanSummary) {
        if path.extension() != Some(OsStr::new("json")) {
            return;
        }

        let messages = match read_export_file(path).await {
            Ok(messages) => messages,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping undecodable entry");
                return;
            }
        };

        let urls = attachment_urls(messages);
        debug!(path = %path.display(), urls = urls.len(), "processing export file");
        summary.files_parsed += 1;
        summary.urls_found += urls.len();

        let stats = self
            .batch
            .download_all(urls, &self.client, &self.store)
            .await;
        summary.completed += stats.completed();
        summary.failed += stats.failed();
    }
}
