//! Archive payload extraction.
//!
//! Extracts a saved zip payload into its generated-identifier directory.
//! Extraction delegates entry-by-entry handling to the `zip` crate, whose
//! `extract` refuses entry names that would escape the destination.

use std::path::Path;

use tracing::{debug, instrument};

use crate::download::DownloadError;

/// Extracts every entry of the zip at `archive_path` into `dest_dir`,
/// creating the destination if absent.
///
/// Runs on the blocking pool; zip reading is synchronous I/O.
///
/// # Errors
///
/// Returns [`DownloadError::Archive`] when the payload is not a readable
/// zip, [`DownloadError::Io`] for filesystem failures.
#[instrument]
pub async fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<(), DownloadError> {
    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| DownloadError::io(dest_dir, e))?;

    let archive_path = archive_path.to_path_buf();
    let dest = dest_dir.to_path_buf();
    let dest_for_join_error = dest.clone();

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive_path)
            .map_err(|e| DownloadError::io(archive_path.clone(), e))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DownloadError::archive(archive_path.clone(), e))?;

        debug!(entries = archive.len(), dest = %dest.display(), "extracting archive");
        archive
            .extract(&dest)
            .map_err(|e| DownloadError::archive(archive_path.clone(), e))
    })
    .await
    .map_err(|e| DownloadError::io(dest_for_join_error, std::io::Error::other(e)))?
}
