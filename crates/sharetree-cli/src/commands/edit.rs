//! Commands that create or rename items.
//!
//! `mkdir`, `touch` and `rename` each apply a single tree mutation and
//! persist the result. A rejected mutation leaves the state file untouched.

use super::common::{Session, report_store_error, split_path};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::TreeStore;
use tracing::info;

/// Result of a successful mutation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditResult {
    /// What was done (created-folder, created-file, renamed)
    pub action: &'static str,
    /// Path of the affected item after the change
    pub path: String,
}

/// Creates the folder at `path`.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub async fn mkdir(session: &Session, path: &str) -> Result<ExitCode> {
    let (parent, name) = split_path(path)?;
    apply(session, "created-folder", parent.join(&name).as_str(), |store| {
        store.create_folder(&parent, &name)
    })
    .await
}

/// Creates the file at `path`.
///
/// Without content or kind the file is empty with no kind; given content
/// defaults to `text/plain`.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub async fn touch(
    session: &Session,
    path: &str,
    content: Option<String>,
    kind: Option<String>,
) -> Result<ExitCode> {
    let (parent, name) = split_path(path)?;
    apply(session, "created-file", parent.join(&name).as_str(), |store| {
        match (content, kind) {
            (None, None) => store.create_empty_file(&parent, &name),
            (content, kind) => store.create_file(
                &parent,
                &name,
                content.unwrap_or_default(),
                kind.unwrap_or_else(|| "text/plain".to_string()),
            ),
        }
    })
    .await
}

/// Renames the item at `path` to `new_name`.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub async fn rename(session: &Session, path: &str, new_name: &str) -> Result<ExitCode> {
    let (parent, name) = split_path(path)?;
    apply(session, "renamed", parent.join(new_name).as_str(), |store| {
        store.rename(&parent, &name, new_name)
    })
    .await
}

async fn apply<F>(session: &Session, action: &'static str, path: &str, mutate: F) -> Result<ExitCode>
where
    F: FnOnce(&mut TreeStore) -> sharetree_store::Result<()>,
{
    let mut store = session.load_store().await?;
    if let Err(error) = mutate(&mut store) {
        return Ok(report_store_error(&error));
    }
    session.save_store(&store).await?;
    info!(action, path, "tree updated");

    session.print(&EditResult {
        action,
        path: path.to_string(),
    })?;
    Ok(ExitCode::SUCCESS)
}
