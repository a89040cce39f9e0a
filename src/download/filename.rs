//! File name derivation for download targets.

use url::Url;

use super::error::DownloadError;

/// Derives the destination file name for a download URL.
///
/// The name is the last `/`-separated segment of the URL's path, used
/// verbatim: no percent-decoding, no query stripping, no sanitization. Export
/// attachment URLs carry well-formed names in their final segment, and the
/// store disambiguates whatever comes out here. A path ending in `/` (or a
/// URL without path segments, e.g. `mailto:`) yields an empty name.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] when the string does not parse as a
/// URL.
pub fn filename_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    Ok(name.to_string())
}
