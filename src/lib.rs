//! Dataset Fetcher
//!
//! Retrieves remote files over HTTP for a downstream batch-processing job:
//! concurrent multi-URL downloads with bounded retry and streaming I/O, and
//! a single-file fetch path with archive extraction.
//!
//! # Architecture
//!
//! - [`headers`] - outbound header construction from an injected credential
//! - [`download`] - chunk policy, retrying fetch, batch fan-out, single-file
//!   fetch
//! - [`archive`] - zip payload extraction
//! - [`workspace`] - job directory layout and generated identifiers
//!
//! What happens to the fetched files (training configuration, job
//! invocation, artifact upload) is the consumer's concern; this crate only
//! hands back paths and metadata.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod download;
pub mod headers;
pub mod workspace;

// Re-export commonly used types
pub use download::{
    BatchDownloader, DEFAULT_MAX_ATTEMPTS, DownloadError, FailureType, FetchedFile, HttpClient,
    RetryDecision, RetryPolicy, SingleFileFetcher, chunk_size_for, classify_error,
    fetch_with_retry,
};
pub use headers::{ApiCredential, HeaderProvider};
pub use workspace::Workspace;
