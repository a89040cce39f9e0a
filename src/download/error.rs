//! Error types for the download module.
//!
//! One download can fail at four points: parsing the URL, talking to the
//! network, reserving a destination file, and writing the body. Each gets its
//! own context-carrying variant so the drop-and-continue policy upstream can
//! log something useful before discarding the error.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while downloading one attachment.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// a stream that died mid-body, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Reserving a destination file failed.
    #[error("could not create destination file: {0}")]
    Store(#[from] StoreError),

    /// File system error while writing the response body.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// `From<StoreError>` is derived because StoreError already carries its path
// context. `From<reqwest::Error>` and `From<std::io::Error>` are intentionally
// NOT implemented - those variants need a url or path the source errors don't
// provide, so callers go through the helper constructors instead.
