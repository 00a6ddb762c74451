//! Concurrent batch downloads with per-URL failure isolation.
//!
//! [`BatchDownloader`] fans a list of URLs out across a semaphore-bounded
//! pool of tasks, each performing a full fetch-with-retry cycle into the
//! job's download directory. One bad URL never aborts the batch: its
//! failure is logged and its entry is simply absent from the result list.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::DownloadError;
use super::client::HttpClient;
use super::retry::{RetryPolicy, fetch_with_retry};
use crate::workspace::Workspace;

/// Batch downloader over a bounded worker pool.
///
/// The pool is sized to host concurrency at construction and is not
/// configurable per call. Results are collected in submission order.
///
/// # Example
///
/// ```no_run
/// use dataset_fetcher::{BatchDownloader, HeaderProvider, HttpClient, Workspace};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(&HeaderProvider::from_env());
/// let downloader = BatchDownloader::new(client, Workspace::current_dir());
/// let files = downloader
///     .download_files_from_urls("job-123", ["https://example.com/a.png", "https://example.com/b.png"])
///     .await?;
/// println!("downloaded {} files", files.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BatchDownloader {
    client: HttpClient,
    policy: RetryPolicy,
    workspace: Workspace,
    concurrency: usize,
}

impl BatchDownloader {
    /// Creates a batch downloader with the default retry policy and a pool
    /// sized to the host's available parallelism.
    #[must_use]
    pub fn new(client: HttpClient, workspace: Workspace) -> Self {
        Self::with_policy(client, workspace, RetryPolicy::default())
    }

    /// Creates a batch downloader with an explicit retry policy.
    #[must_use]
    pub fn with_policy(client: HttpClient, workspace: Workspace, policy: RetryPolicy) -> Self {
        let concurrency = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        Self {
            client,
            policy,
            workspace,
            concurrency,
        }
    }

    /// Returns the worker-pool bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every URL into `jobs/{job_id}/downloaded_files/`,
    /// returning absolute paths for the URLs that succeeded.
    ///
    /// Each URL gets a freshly generated identifier as its base name (the
    /// URL's extension is appended), so concurrent downloads never collide.
    /// Empty URLs and URLs whose fetch fails after retries yield no entry;
    /// the returned list preserves submission order with failures removed.
    /// A shorter-than-expected list is partial success, not an error.
    ///
    /// Blocks until every submitted download has completed (fan-out/fan-in;
    /// no partial results early, no cancellation once started).
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] only if the job download directory
    /// cannot be created. Individual fetch failures never propagate.
    #[instrument(skip(self, urls), fields(job_id = %job_id))]
    pub async fn download_files_from_urls<I, S>(
        &self,
        job_id: &str,
        urls: I,
    ) -> Result<Vec<PathBuf>, DownloadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let download_dir = self.workspace.ensure_job_download_dir(job_id).await?;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        // Submission order is preserved by joining handles in order below;
        // completion order between workers is unconstrained.
        let mut handles = Vec::new();
        for url in urls {
            let url: String = url.into();
            if url.is_empty() {
                debug!("skipping empty url");
                handles.push(None);
                continue;
            }

            let semaphore = Arc::clone(&semaphore);
            let client = self.client.clone();
            let policy = self.policy.clone();
            let dest_prefix = download_dir.join(Workspace::generate_id());

            handles.push(Some(tokio::spawn(async move {
                // Pool bound: the permit is held for the whole fetch cycle
                // and released on drop.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                match fetch_with_retry(&client, &url, &dest_prefix, &policy).await {
                    Ok(path) => {
                        info!(url = %url, path = %path.display(), "download completed");
                        Some(path)
                    }
                    Err((e, attempts)) => {
                        warn!(url = %url, error = %e, attempts, "failed to download");
                        None
                    }
                }
            })));
        }

        let submitted = handles.iter().filter(|h| h.is_some()).count();
        debug!(task_count = submitted, "waiting for downloads to complete");

        let mut downloaded = Vec::new();
        for handle in handles.into_iter().flatten() {
            match handle.await {
                Ok(Some(path)) => downloaded.push(path),
                Ok(None) => {}
                // Task panics are logged but don't fail the batch
                Err(e) => warn!(error = %e, "download task panicked"),
            }
        }

        info!(
            completed = downloaded.len(),
            failed = submitted - downloaded.len(),
            "batch complete"
        );
        Ok(downloaded)
    }

    /// Downloads a single URL, normalizing it into a one-element batch.
    ///
    /// Returns `None` when the URL is empty or its fetch failed.
    ///
    /// # Errors
    ///
    /// Same as [`download_files_from_urls`](Self::download_files_from_urls).
    pub async fn download_file_from_url(
        &self,
        job_id: &str,
        url: &str,
    ) -> Result<Option<PathBuf>, DownloadError> {
        let mut paths = self.download_files_from_urls(job_id, [url]).await?;
        Ok(paths.pop())
    }
}
