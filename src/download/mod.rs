//! Concurrent HTTP downloading of export attachments.
//!
//! This module provides the per-file download pipeline: a shared streaming
//! [`HttpClient`], the [`BatchDownloader`] that fans one JSON file's URL list
//! out into concurrent tasks, and the name resolution that turns a URL into a
//! destination file name.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use slackfetch_core::{BatchDownloader, FileStore, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let store = Arc::new(FileStore::new("./attachments"));
//! let batch = BatchDownloader::new(10)?;
//! let urls = vec!["https://example.com/files/photo.png".to_string()];
//! let stats = batch.download_all(urls, &client, &store).await;
//! println!("{} of {} downloaded", stats.completed(), stats.total());
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod error;
mod filename;

pub use batch::{BatchDownloader, BatchError, DEFAULT_CONCURRENCY, DownloadStats};
pub use client::{HttpClient, SavedFile};
pub use error::DownloadError;
pub use filename::filename_from_url;

// Note: no module-local Result aliases. Use `Result<T, DownloadError>`
// explicitly in function signatures.
