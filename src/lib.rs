//! Slackfetch Core Library
//!
//! This library provides the core functionality for the slackfetch tool,
//! which walks a Slack export tree, collects the attachment URLs embedded
//! in message transcripts, and downloads every referenced file into a flat
//! destination directory with collision-safe naming.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - HTTP client, per-file batch orchestration, name resolution
//! - [`scan`] - Export tree walking and transcript schema decoding
//! - [`store`] - Serialized, collision-safe destination file creation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod scan;
pub mod store;

// Re-export commonly used types
pub use download::{
    BatchDownloader, BatchError, DEFAULT_CONCURRENCY, DownloadError, DownloadStats, HttpClient,
};
pub use scan::{ExportScanner, ScanError, ScanSummary};
pub use store::{CreatedFile, FileStore, StoreError};
