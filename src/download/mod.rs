//! HTTP fetch pipeline: chunked streaming, bounded retry, concurrent
//! batches, and the buffered single-file path.
//!
//! # Overview
//!
//! Two entry points share one [`HttpClient`]:
//!
//! - [`BatchDownloader`] streams many URLs to disk concurrently, retrying
//!   each with [`RetryPolicy`] and isolating per-URL failures.
//! - [`SingleFileFetcher`] buffers one URL in memory, persists it, and
//!   extracts zip payloads.
//!
//! # Example
//!
//! ```no_run
//! use dataset_fetcher::{BatchDownloader, HeaderProvider, HttpClient, Workspace};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(&HeaderProvider::from_env());
//! let downloader = BatchDownloader::new(client, Workspace::current_dir());
//! let files = downloader
//!     .download_files_from_urls("job-123", ["https://example.com/part-1.bin"])
//!     .await?;
//! println!("downloaded {} files", files.len());
//! # Ok(())
//! # }
//! ```

mod batch;
pub mod chunk;
mod client;
mod constants;
mod error;
pub mod filename;
mod retry;
mod single;

pub use batch::BatchDownloader;
pub use chunk::chunk_size_for;
pub use client::{BufferedResponse, HttpClient};
pub use constants::REQUEST_TIMEOUT;
pub use error::DownloadError;
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
    fetch_with_retry,
};
pub use single::{FetchedFile, SingleFileFetcher};

// Note: no module-local Result aliases. Use `Result<T, DownloadError>`
// explicitly in function signatures.
