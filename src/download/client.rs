//! HTTP client for fetching remote files.
//!
//! One client serves both transfer modes the crate needs: streaming a body
//! to disk in policy-sized chunks (batch path) and buffering a body fully in
//! memory (single-file path). Request construction, the per-attempt timeout,
//! and error mapping are shared so the two modes cannot drift.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::chunk::chunk_size_for;
use super::constants::REQUEST_TIMEOUT;
use super::error::DownloadError;
use super::filename::extension_from_url;
use crate::headers::HeaderProvider;

/// HTTP client for fetching files.
///
/// Create once and reuse; the underlying connection pool is shared across
/// concurrent downloads. Cloning is cheap (the pool is reference-counted).
///
/// # Example
///
/// ```no_run
/// use dataset_fetcher::{HeaderProvider, HttpClient};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(&HeaderProvider::from_env());
/// let path = client
///     .download_to_path("https://example.com/set.zip", Path::new("./downloads/abc123"))
///     .await?;
/// println!("Saved to: {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A fully buffered response from [`HttpClient::fetch_buffered`].
#[derive(Debug)]
pub struct BufferedResponse {
    /// The complete response body.
    pub body: Vec<u8>,
    /// Raw Content-Disposition header value, if the server sent one.
    pub content_disposition: Option<String>,
}

impl HttpClient {
    /// Creates a client with the default 30-second per-attempt timeout.
    ///
    /// Every request carries the provider's headers (content type,
    /// authorization, user agent).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(headers: &HeaderProvider) -> Self {
        Self::with_timeout(headers, REQUEST_TIMEOUT)
    }

    /// Creates a client with an explicit per-attempt timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(headers: &HeaderProvider, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .default_headers(headers.build_headers())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Streams `url` to disk at `{dest_prefix}{extension}`.
    ///
    /// The extension is taken from the URL's path suffix (empty when the
    /// path has none); the caller supplies the base name via `dest_prefix`.
    /// The body is written through a buffer sized by the chunk policy from
    /// the declared Content-Length, so peak memory stays at one chunk
    /// regardless of payload size. Zero-length stream chunks are skipped.
    ///
    /// A single attempt; retry belongs to
    /// [`fetch_with_retry`](super::retry::fetch_with_retry).
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails
    /// (network error, timeout), the server returns a non-success status,
    /// or writing to disk fails. A partial file is removed on failure.
    #[must_use = "download result contains the path to the saved file"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_to_path(
        &self,
        url: &str,
        dest_prefix: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_request(url).await?;

        let content_length = declared_content_length(&response);
        let chunk_size = chunk_size_for(content_length);

        let extension = extension_from_url(&parsed_url).unwrap_or_default();
        let file_path = append_extension(dest_prefix, &extension);
        debug!(
            path = %file_path.display(),
            content_length,
            chunk_size,
            "resolved output path"
        );

        let file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let stream_result = stream_to_file(file, response, url, &file_path, chunk_size).await;

        if stream_result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes_written = stream_result?;

        info!(path = %file_path.display(), bytes = bytes_written, "download complete");
        Ok(file_path)
    }

    /// Fetches `url` fully into memory in one attempt.
    ///
    /// Used by the single-file path, which needs the whole body at once to
    /// persist and possibly extract it, plus the Content-Disposition header
    /// for display-name derivation.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails, or
    /// the server returns a non-success status.
    #[must_use = "buffered response contains the payload body"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_buffered(&self, url: &str) -> Result<BufferedResponse, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_request(url).await?;

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DownloadError::timeout(url)
                } else {
                    DownloadError::network(url, e)
                }
            })?
            .to_vec();

        debug!(bytes = body.len(), "buffered fetch complete");
        Ok(BufferedResponse {
            body,
            content_disposition,
        })
    }

    /// Issues a GET and maps transport/status failures into `DownloadError`.
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Streams the response body to a file, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error. The
/// write buffer is sized to the chunk policy; empty chunks are skipped.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    chunk_size: usize,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(chunk_size, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        if chunk.is_empty() {
            continue;
        }

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

/// Reads the declared Content-Length, 0 when absent or unparseable.
fn declared_content_length(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Appends an already-dotted extension to a path without replacing any
/// existing suffix of the prefix (UUID prefixes may contain no dots, but
/// `Path::with_extension` would still mangle a dotted workspace segment).
fn append_extension(dest_prefix: &Path, extension: &str) -> PathBuf {
    let mut name = dest_prefix.as_os_str().to_os_string();
    name.push(extension);
    PathBuf::from(name)
}
