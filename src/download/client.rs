//! HTTP client wrapper for downloading attachments.
//!
//! This module provides the `HttpClient` struct which fetches one URL and
//! streams the response body into a file reserved through the store.

use std::path::PathBuf;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use super::filename::filename_from_url;
use crate::store::FileStore;

/// HTTP client for downloading attachments with streaming support.
///
/// Designed to be created once and cloned into download tasks, taking
/// advantage of reqwest's shared connection pool. No request or connect
/// timeouts are configured: a download hangs as long as its server does,
/// and only blocks its own task.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A successfully downloaded attachment.
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// Final destination path, including any collision suffix.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// Configuration: gzip decompression enabled, identifying `User-Agent`,
    /// reqwest's default redirect policy, no timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads one URL into a file reserved through `store`.
    ///
    /// The sequence is GET, then name resolution, then file reservation, then
    /// streaming copy; the first failing step aborts the download. The
    /// response status line is deliberately not inspected - a 404 page or a
    /// login page is saved as file content like any other body. A file
    /// partially written before a stream error stays on disk.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the URL does not parse, the request
    /// fails at the transport level, the store cannot create a destination
    /// file, or writing the body fails.
    #[instrument(skip(self, store), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        store: &FileStore,
    ) -> Result<SavedFile, DownloadError> {
        debug!("starting download");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                DownloadError::invalid_url(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let name = filename_from_url(url)?;
        let mut created = store.create(&name).await?;
        debug!(name = %name, path = %created.path.display(), "reserved destination file");

        let bytes = stream_to_file(&mut created.file, response, url, &created.path).await?;

        info!(path = %created.path.display(), bytes, "saved attachment");
        Ok(SavedFile {
            path: created.path,
            bytes,
        })
    }
}

/// Streams the response body to the file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &std::path::Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn default_user_agent() -> String {
    format!("slackfetch/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();

        let result = client.download("not-a-valid-url", &store).await;

        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_download_success_streams_body() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/files/photo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG bytes here"))
            .mount(&mock_server)
            .await;

        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();
        let url = format!("{}/files/photo.png", mock_server.uri());

        let saved = client.download(&url, &store).await.unwrap();

        assert_eq!(saved.path, temp_dir.path().join("photo.png"));
        assert_eq!(saved.bytes, 14);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"PNG bytes here");
    }

    #[tokio::test]
    async fn test_download_saves_error_page_body() {
        // Status codes are not checked: a 404 body lands on disk.
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/gone.pdf"))
            .respond_with(ResponseTemplate::new(404).set_body_bytes(b"<html>not found</html>"))
            .mount(&mock_server)
            .await;

        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();
        let url = format!("{}/gone.pdf", mock_server.uri());

        let saved = client.download(&url, &store).await.unwrap();

        assert_eq!(saved.path, temp_dir.path().join("gone.pdf"));
        assert_eq!(
            std::fs::read(&saved.path).unwrap(),
            b"<html>not found</html>"
        );
    }

    #[tokio::test]
    async fn test_download_connection_refused_is_network_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();

        // Bind a port, then drop the listener so connections are refused.
        let refused_url = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let port = listener.local_addr().unwrap().port();
            drop(listener);
            format!("http://127.0.0.1:{port}/a.png")
        };

        let result = client.download(&refused_url, &store).await;

        assert!(matches!(result, Err(DownloadError::Network { .. })));
        assert!(
            std::fs::read_dir(temp_dir.path()).unwrap().next().is_none(),
            "no file may be created for a failed request"
        );
    }

    #[tokio::test]
    async fn test_download_trailing_slash_resolves_empty_name() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/dir/"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"listing"))
            .mount(&mock_server)
            .await;

        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();
        let url = format!("{}/dir/", mock_server.uri());

        let saved = client.download(&url, &store).await.unwrap();

        // Empty name: the destination root exists, so the store hands out "(1)".
        assert_eq!(saved.path, temp_dir.path().join("(1)"));
    }

    #[tokio::test]
    async fn test_download_collision_gets_suffixed_name() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("photo.png"), b"already here").unwrap();

        Mock::given(method("GET"))
            .and(path("/photo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new content"))
            .mount(&mock_server)
            .await;

        let store = FileStore::new(temp_dir.path());
        let client = HttpClient::new();
        let url = format!("{}/photo.png", mock_server.uri());

        let saved = client.download(&url, &store).await.unwrap();

        assert_eq!(saved.path, temp_dir.path().join("photo(1).png"));
        assert_eq!(
            std::fs::read(temp_dir.path().join("photo.png")).unwrap(),
            b"already here"
        );
    }
}
