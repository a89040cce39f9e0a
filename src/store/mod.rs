//! Collision-safe destination file creation.
//!
//! All downloads in a run share one [`FileStore`]. The store owns the
//! destination root and is the only code allowed to create files under it:
//! callers hand it a desired file name and get back a freshly created,
//! uniquely named file. When the desired name is taken the store appends a
//! `(n)` parenthetical to the stem and keeps probing until it finds a free
//! name, so `report.pdf` becomes `report(1).pdf`, then `report(2).pdf`, and
//! so on.

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::sync::Mutex;

/// Errors surfaced by [`FileStore::create`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The filesystem rejected the creation call for the chosen candidate.
    #[error("failed to create {path}: {source}")]
    Create {
        /// Candidate path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A newly created destination file.
///
/// The handle is open for writing and positioned at offset 0; `path` is the
/// final, disambiguated location on disk.
#[derive(Debug)]
pub struct CreatedFile {
    /// Final path, including any `(n)` suffix that was applied.
    pub path: PathBuf,
    /// Open, writable handle to the new file.
    pub file: File,
}

/// Single-owner service that reserves unique destination names.
///
/// Concurrent download tasks race to name their output files; the store
/// serializes every reserve-and-create sequence through one internal mutex so
/// that no two callers can observe the same candidate name as absent and both
/// create it. That exclusivity is the interface contract: for any set of
/// concurrent [`create`](FileStore::create) calls, each returns a distinct
/// path and none overwrites an existing file.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    // Held across the probe loop and the creation call of one reservation.
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory is not created or
    /// validated here; creation failures surface per call.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    /// Destination root this store writes under.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Reserves a unique name derived from `name` and creates the file.
    ///
    /// The name is split into stem and extension at its last `.`; while the
    /// candidate exists on disk the stem's trailing `(n)` parenthetical is
    /// incremented (or `(1)` is appended when there is none, or when the
    /// parenthetical does not contain an integer). The creation itself uses
    /// create-new semantics, so an existing file is never truncated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Create`] when the filesystem rejects the
    /// creation call (missing destination directory, permissions, etc.).
    /// The error is propagated as-is; no other candidate is tried.
    pub async fn create(&self, name: &str) -> Result<CreatedFile, StoreError> {
        let _guard = self.lock.lock().await;

        let (mut stem, ext) = split_name(name);
        loop {
            let path = self.root.join(format!("{stem}{ext}"));
            // A probe error counts as absent; the create call reports the
            // real problem if there is one.
            let taken = matches!(fs::try_exists(&path).await, Ok(true));
            if !taken {
                let file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&path)
                    .await
                    .map_err(|source| StoreError::Create {
                        path: path.clone(),
                        source,
                    })?;
                return Ok(CreatedFile { path, file });
            }
            stem = next_stem(&stem);
        }
    }
}

/// Splits a file name into stem and extension at the last `.`.
///
/// The extension keeps its dot and is empty when the name has none. Names
/// starting with a dot split into an empty stem and a dotted extension, so
/// `.bashrc` collides to `(1).bashrc`.
fn split_name(name: &str) -> (String, &str) {
    match name.rfind('.') {
        Some(pos) => (name[..pos].to_string(), &name[pos..]),
        None => (name.to_string(), ""),
    }
}

/// Advances a stem to its next collision candidate.
///
/// A stem without a trailing parenthetical gets `(1)` appended. A trailing
/// `(n)` holding an integer is rewritten with `n + 1`. Anything else between
/// the final parens - or a `)` with no `(` before it, or a counter that
/// cannot be incremented without overflowing - is treated as literal text
/// and also gets `(1)` appended.
fn next_stem(stem: &str) -> String {
    if !stem.ends_with(')') {
        return format!("{stem}(1)");
    }
    let Some(open) = stem.rfind('(') else {
        return format!("{stem}(1)");
    };
    let inner = &stem[open + 1..stem.len() - 1];
    match inner.parse::<i64>().ok().and_then(|n| n.checked_add(1)) {
        Some(next) => format!("{}({})", &stem[..open], next),
        None => format!("{stem}(1)"),
    }
}
