//! Single-file fetch with optional archive extraction.
//!
//! The simple path: one buffered GET, no retry, no failure containment.
//! The payload is persisted under the shared workspace with a generated
//! identifier, and zip payloads are extracted into a sibling directory
//! named by the same identifier.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

use super::client::HttpClient;
use super::error::DownloadError;
use super::filename::{display_name_from_url, file_type_from_name, parse_content_disposition};
use crate::archive::extract_zip;
use crate::workspace::Workspace;

/// File type treated as an extractable archive.
const ARCHIVE_TYPE: &str = "zip";

/// Result of a single-file fetch, handed across the job boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedFile {
    /// Absolute path of the saved payload.
    pub file_path: PathBuf,
    /// Extension of the display name without its dot; may be empty.
    pub file_type: String,
    /// Display name from Content-Disposition, else the URL's base name.
    pub original_name: String,
    /// Absolute path of the extracted directory, present only for archives.
    pub extracted_path: Option<PathBuf>,
}

/// Fetches one URL fully into memory, persists it, and extracts archives.
///
/// Unlike the batch path this performs exactly one attempt and propagates
/// every failure to the caller; containment is the caller's concern.
///
/// # Example
///
/// ```no_run
/// use dataset_fetcher::{HeaderProvider, HttpClient, SingleFileFetcher, Workspace};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(&HeaderProvider::from_env());
/// let fetcher = SingleFileFetcher::new(client, Workspace::current_dir());
/// let fetched = fetcher.fetch_file("https://example.com/train-set.zip").await?;
/// if let Some(dataset_dir) = &fetched.extracted_path {
///     println!("dataset at {}", dataset_dir.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SingleFileFetcher {
    client: HttpClient,
    workspace: Workspace,
}

impl SingleFileFetcher {
    /// Creates a fetcher saving into `workspace`'s shared directory.
    #[must_use]
    pub fn new(client: HttpClient, workspace: Workspace) -> Self {
        Self { client, workspace }
    }

    /// Fetches `file_url`, saves it as `job_files/{id}.{type}`, and, when
    /// the payload is a zip, extracts it into `job_files/{id}/`.
    ///
    /// The display name comes from the response's Content-Disposition
    /// `filename` parameter when present, else from the URL path's base
    /// name; the file type is that name's extension. The generated
    /// identifier is fresh per call, so repeated fetches of the same URL
    /// never overwrite each other.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`DownloadError`]: request failures and
    /// non-success statuses, IO failures, and unreadable archives. No
    /// retry at this layer.
    #[instrument(skip(self), fields(url = %file_url))]
    pub async fn fetch_file(&self, file_url: &str) -> Result<FetchedFile, DownloadError> {
        let parsed_url = Url::parse(file_url).map_err(|_| DownloadError::invalid_url(file_url))?;
        let shared_dir = self.workspace.ensure_shared_dir().await?;

        let response = self.client.fetch_buffered(file_url).await?;

        let original_name = response
            .content_disposition
            .as_deref()
            .and_then(parse_content_disposition)
            .unwrap_or_else(|| display_name_from_url(&parsed_url));
        let file_type = file_type_from_name(&original_name);

        let file_id = Workspace::generate_id();
        let file_path = shared_dir.join(format!("{file_id}.{file_type}"));

        tokio::fs::write(&file_path, &response.body)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let extracted_path = if file_type == ARCHIVE_TYPE {
            let dest = shared_dir.join(&file_id);
            extract_zip(&file_path, &dest).await?;
            Some(dest)
        } else {
            None
        };

        info!(
            path = %file_path.display(),
            original_name = %original_name,
            file_type = %file_type,
            extracted = extracted_path.is_some(),
            "file fetch complete"
        );

        Ok(FetchedFile {
            file_path,
            file_type,
            original_name,
            extracted_path,
        })
    }
}
