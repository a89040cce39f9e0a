//! Concurrent batch downloads with a bounded admission semaphore.
//!
//! One batch covers the attachments of a single export file. Every URL gets
//! its own task; a shared semaphore caps how many run at once. Individual
//! failures are logged and counted, never propagated.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{instrument, warn};

use super::client::HttpClient;
use crate::store::FileStore;

/// Lowest accepted concurrency bound.
const MIN_CONCURRENCY: usize = 1;

/// Highest accepted concurrency bound.
const MAX_CONCURRENCY: usize = 100;

/// Concurrency bound used when the caller does not pick one.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Errors that can occur when configuring a batch downloader.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(
        "concurrency must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}, got {value}"
    )]
    InvalidConcurrency { value: usize },
}

/// Outcome counters for one batch.
///
/// `completed` plus `failed` always equals the number of URLs attempted, so
/// a caller can report "N attempted, M succeeded" without tracking URLs
/// itself.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Number of downloads that finished with a file on disk.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Number of downloads that were attempted and failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Total number of attempted downloads.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn from_counts(completed: usize, failed: usize) -> Self {
        Self {
            completed: AtomicUsize::new(completed),
            failed: AtomicUsize::new(failed),
        }
    }
}

/// Runs download batches with a fixed upper bound on in-flight requests.
#[derive(Debug)]
pub struct BatchDownloader {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl BatchDownloader {
    /// Creates a batch downloader that runs at most `concurrency` downloads
    /// at a time.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConcurrency`] when `concurrency` is
    /// outside `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
    pub fn new(concurrency: usize) -> Result<Self, BatchError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(BatchError::InvalidConcurrency {
                value: concurrency,
            });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Configured concurrency bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every URL in `urls`, waiting for all of them to settle.
    ///
    /// Each URL is spawned as its own task immediately; the semaphore gates
    /// how many are past admission at any moment. A failed download is
    /// logged at warn level and counted, and never stops the rest of the
    /// batch.
    #[instrument(skip(self, urls, client, store), fields(urls = urls.len()))]
    pub async fn download_all(
        &self,
        urls: Vec<String>,
        client: &HttpClient,
        store: &Arc<FileStore>,
    ) -> DownloadStats {
        let stats = Arc::new(DownloadStats::default());
        let mut handles = Vec::with_capacity(urls.len());

        for url in urls {
            let permits = Arc::clone(&self.semaphore);
            let client = client.clone();
            let store = Arc::clone(store);
            let stats = Arc::clone(&stats);

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed while a batch is running.
                let Ok(_permit) = permits.acquire_owned().await else {
                    stats.increment_failed();
                    return;
                };

                match client.download(&url, &store).await {
                    Ok(_saved) => stats.increment_completed(),
                    Err(e) => {
                        warn!(url = %url, error = %e, "download failed");
                        stats.increment_failed();
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                // A task that died never reached its own increment.
                warn!(error = %e, "download task did not complete");
                stats.increment_failed();
            }
        }

        Arc::try_unwrap(stats)
            .unwrap_or_else(|shared| DownloadStats::from_counts(shared.completed(), shared.failed()))
    }
}
