//! Decoding of Slack export files and attachment URL extraction.
//!
//! An export file is a JSON array of message records. Only the `type` tag
//! and the per-file `url_private_download` field matter here; everything
//! else in a record is ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

/// Errors that can occur when reading one export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not read export file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode export file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One record from an export file.
///
/// Records missing either field still decode: `kind` defaults to empty and
/// `files` to none, so sparse real-world exports pass through undisturbed.
#[derive(Debug, Deserialize)]
pub struct Message {
    /// Record type tag; only `"message"` records carry attachments we want.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// File attachments listed on the record.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One attachment entry on a message record.
#[derive(Debug, Deserialize)]
pub struct FileEntry {
    /// Download URL as recorded in the export; may be empty.
    #[serde(rename = "url_private_download", default)]
    pub url: String,
}

/// Reads and decodes one export file into its message records.
///
/// # Errors
///
/// Returns [`ExportError`] when the file cannot be read or its content is
/// not a JSON array of records.
pub async fn read_export_file(path: &Path) -> Result<Vec<Message>, ExportError> {
    let bytes = fs::read(path).await.map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ExportError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Collects attachment URLs from message records, in record order.
///
/// Every `url_private_download` value on a `"message"` record is kept,
/// duplicates and empty strings included. Records with any other type tag
/// contribute nothing.
#[must_use]
pub fn attachment_urls(messages: Vec<Message>) -> Vec<String> {
    messages
        .into_iter()
        .filter(|message| message.kind == "message")
        .flat_map(|message| message.files.into_iter().map(|file| file.url))
        .collect()
}
