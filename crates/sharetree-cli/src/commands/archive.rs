//! Archive command implementation.
//!
//! Saves a folder as a tar archive, or a single file as its raw bytes.

use super::common::{Session, report_archive_error, write_output};
use anyhow::Result;
use serde::Serialize;
use sharetree_archive::{ArchiveFormat, download};
use sharetree_core::cli::ExitCode;
use sharetree_store::TreeStore;
use std::path::Path;
use tracing::info;

/// Result of saving an item to disk.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SavedBlob {
    /// Tree path that was saved
    pub source: String,
    /// File written on disk
    pub file: String,
    /// MIME type of the written bytes
    pub mime: String,
    /// Bytes written
    pub size: usize,
}

/// Runs the archive command against the local tree.
///
/// # Errors
///
/// Returns an error if the state file cannot be read, the format is
/// unknown or the output cannot be written.
pub async fn run(
    session: &Session,
    path: &str,
    output: &Path,
    archive_format: Option<&str>,
) -> Result<ExitCode> {
    let format = session.archive_format(archive_format)?;
    let store = session.load_store().await?;
    save(session, &store, path, output, format).await
}

/// Saves `path` of an already loaded tree into `output`.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub async fn save(
    session: &Session,
    store: &TreeStore,
    path: &str,
    output: &Path,
    format: ArchiveFormat,
) -> Result<ExitCode> {
    let blob = match download(store, path, format).await {
        Ok(blob) => blob,
        Err(error) => return Ok(report_archive_error(&error)),
    };

    let written = write_output(output, &blob.name, &blob.bytes).await?;
    info!(source = path, file = %written.display(), size = blob.len(), "saved blob");

    session.print(&SavedBlob {
        source: path.to_string(),
        file: written.display().to_string(),
        mime: blob.mime,
        size: blob.bytes.len(),
    })?;
    Ok(ExitCode::SUCCESS)
}
