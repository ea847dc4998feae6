//! Cat command implementation.
//!
//! Prints a file. Text content is printed as stored; binary content is
//! summarized unless JSON output is requested.

use super::common::{Session, report_store_error};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::{ExitCode, OutputFormat};
use sharetree_store::{StoreError, TreePath};

/// A file as reported by `cat --format json`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileView {
    /// File path
    pub path: String,
    /// Content kind
    pub kind: String,
    /// Whether the content is base64 data
    pub binary: bool,
    /// Stored content
    pub content: String,
}

/// Runs the cat command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub async fn run(session: &Session, path: &str) -> Result<ExitCode> {
    let store = session.load_store().await?;
    let path = TreePath::new(path);
    let Some(file) = store.file(&path) else {
        return Ok(report_store_error(&StoreError::NotFound {
            path: path.to_string(),
        }));
    };

    match session.format {
        OutputFormat::Json => session.print(&FileView {
            path: path.to_string(),
            kind: file.kind().as_str().to_string(),
            binary: file.kind().is_binary(),
            content: file.content().to_string(),
        })?,
        OutputFormat::Text | OutputFormat::Pretty if file.kind().is_binary() => {
            let decoded = file.payload_bytes().map_or(0, |bytes| bytes.len());
            println!("<{} data, {decoded} bytes>", file.kind());
        }
        OutputFormat::Text | OutputFormat::Pretty => print!("{}", file.content()),
    }
    Ok(ExitCode::SUCCESS)
}
