//! Add command implementation.
//!
//! Ingests local files into a folder of the tree.

use super::common::{Session, report_store_error, store_exit_code};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::ingest::{LocalFile, ingest_batch};
use sharetree_store::{StoreError, TreePath};
use std::path::PathBuf;
use tracing::info;

/// A file that could not be added.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddFailure {
    /// Source file name
    pub name: String,
    /// Why it was skipped
    pub error: String,
}

/// Result of an add.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddResult {
    /// Paths of the created files
    pub created: Vec<String>,
    /// Skipped files
    pub failed: Vec<AddFailure>,
}

/// Runs the add command.
///
/// The state file is written if at least one file was added. Exits with
/// `ExitCode::PARTIAL` when some files were skipped, or with the failure's
/// own code when every file failed for the same reason.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub async fn run(session: &Session, files: Vec<PathBuf>, to: &str) -> Result<ExitCode> {
    let target = TreePath::new(to);
    let mut store = session.load_store().await?;

    // A missing target would otherwise be reported once per file.
    if let Err(error) = store.locate(&target) {
        return Ok(report_store_error(&error));
    }

    let sources: Vec<LocalFile> = files.into_iter().map(LocalFile::new).collect();
    let report = ingest_batch(&mut store, &sources, &target).await;

    if !report.created.is_empty() {
        session.save_store(&store).await?;
    }
    info!(created = report.created.len(), failed = report.failed.len(), "add complete");

    let errors: Vec<_> = report.failed.iter().map(|failure| &failure.error).collect();
    let code = exit_code(&errors, report.created.is_empty());
    session.print(&AddResult {
        created: report.created.iter().map(ToString::to_string).collect(),
        failed: report
            .failed
            .iter()
            .map(|failure| AddFailure {
                name: failure.name.clone(),
                error: failure.error.to_string(),
            })
            .collect(),
    })?;
    Ok(code)
}

fn exit_code(errors: &[&StoreError], nothing_created: bool) -> ExitCode {
    match errors {
        [] => ExitCode::SUCCESS,
        [first, ..] if nothing_created => store_exit_code(first),
        _ => ExitCode::PARTIAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_selection() {
        let missing = StoreError::NotFound {
            path: "/x".to_string(),
        };
        assert_eq!(exit_code(&[], false), ExitCode::SUCCESS);
        assert_eq!(exit_code(&[&missing], false), ExitCode::PARTIAL);
        assert_eq!(exit_code(&[&missing], true), ExitCode::NOT_FOUND);
    }
}
