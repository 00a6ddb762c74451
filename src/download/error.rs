//! Error types for the download module.
//!
//! Structured errors for every fetch operation, carrying enough context
//! (URL, path, status) to make a failed batch entry diagnosable from logs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or persisting a remote file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS, resets).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the per-attempt timeout budget.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while persisting a download (create, write, mkdir).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The saved payload is not a readable archive.
    #[error("archive error extracting {path}: {source}")]
    Archive {
        /// Path of the archive that failed to extract.
        path: PathBuf,
        /// The underlying archive error.
        #[source]
        source: zip::result::ZipError,
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

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an archive extraction error.
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (url, path)
// that the source errors don't carry. The helper constructors are the
// pattern here; callers always know the URL or path at the failure site.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = DownloadError::timeout("https://example.com/data.zip");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/data.zip"));
    }

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://example.com/data.zip", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/data.zip"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/data.zip"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/data.zip"), "Expected path in: {msg}");
    }

    #[test]
    fn test_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(
            msg.contains("invalid URL"),
            "Expected 'invalid URL' in: {msg}"
        );
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_archive_display() {
        let error = DownloadError::archive(
            PathBuf::from("/tmp/broken.zip"),
            zip::result::ZipError::FileNotFound,
        );
        let msg = error.to_string();
        assert!(msg.contains("archive error"), "Expected prefix in: {msg}");
        assert!(msg.contains("/tmp/broken.zip"), "Expected path in: {msg}");
    }
}
