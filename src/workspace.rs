//! Job workspace layout and generated file identifiers.
//!
//! Downloads land in one of two places under a workspace root: a job-scoped
//! tree (`jobs/{job_id}/downloaded_files/`) for batch downloads, or the
//! shared tree (`job_files/`) for single-file fetches. Directories are
//! created lazily and idempotently; nothing here ever deletes — cleanup
//! belongs to the job orchestrator.

use std::path::{Path, PathBuf};

use tracing::instrument;
use uuid::Uuid;

use crate::download::DownloadError;

/// Directory under the root holding per-job trees.
pub const JOBS_DIR: &str = "jobs";

/// Per-job subdirectory holding that job's downloads.
pub const DOWNLOADED_FILES_DIR: &str = "downloaded_files";

/// Shared directory for single-file fetches.
pub const SHARED_FILES_DIR: &str = "job_files";

/// Root of the directory tree downloads are saved under.
///
/// The default root is the process working directory, matching the layout
/// consumers expect; tests inject a temporary root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::current_dir()
    }
}

impl Workspace {
    /// Creates a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a workspace rooted at the process working directory.
    #[must_use]
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    /// Returns the workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the download directory for a job:
    /// `{root}/jobs/{job_id}/downloaded_files`.
    #[must_use]
    pub fn job_download_dir(&self, job_id: &str) -> PathBuf {
        self.root
            .join(JOBS_DIR)
            .join(job_id)
            .join(DOWNLOADED_FILES_DIR)
    }

    /// Returns the shared single-file directory: `{root}/job_files`.
    #[must_use]
    pub fn shared_dir(&self) -> PathBuf {
        self.root.join(SHARED_FILES_DIR)
    }

    /// Creates the job download directory if absent and returns it as an
    /// absolute path. Safe under concurrent creation attempts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if the directory cannot be created.
    #[instrument(skip(self))]
    pub async fn ensure_job_download_dir(&self, job_id: &str) -> Result<PathBuf, DownloadError> {
        ensure_dir(self.job_download_dir(job_id)).await
    }

    /// Creates the shared single-file directory if absent and returns it as
    /// an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if the directory cannot be created.
    #[instrument(skip(self))]
    pub async fn ensure_shared_dir(&self) -> Result<PathBuf, DownloadError> {
        ensure_dir(self.shared_dir()).await
    }

    /// Generates a random identifier used as a file's base name.
    ///
    /// Freshly generated per download, so concurrent downloads sharing a
    /// directory never collide; an archive's extraction directory reuses the
    /// same identifier to link the two.
    #[must_use]
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Idempotent create + absolutize.
async fn ensure_dir(dir: PathBuf) -> Result<PathBuf, DownloadError> {
    let dir = std::path::absolute(&dir).map_err(|e| DownloadError::io(dir.clone(), e))?;
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| DownloadError::io(dir.clone(), e))?;
    Ok(dir)
}
