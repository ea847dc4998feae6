//! Open command implementation.
//!
//! Decodes a share link into a read-only tree, then shows it, saves part
//! of it, or imports it into the local state file.

use super::common::{Session, report_store_error};
use super::{archive, ls};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::{TreeStore, share};
use std::path::Path;
use tracing::info;

/// What to do with the opened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAction<'a> {
    /// Show the tree at the path
    Show,
    /// Save the path into a directory
    Archive(&'a Path),
    /// Replace the local tree
    Import,
}

/// Result of importing a shared tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportResult {
    /// State file that now holds the shared tree
    pub path: String,
    /// Number of files in the imported tree
    pub files: usize,
}

/// Runs the open command.
///
/// # Errors
///
/// Returns an error if output or the local state file cannot be written.
pub async fn run(session: &Session, link: &str, path: &str, action: OpenAction<'_>) -> Result<ExitCode> {
    let param = &session.config.share.query_param;
    let token = share::token_from_url(link, param).unwrap_or_else(|| link.to_string());
    let shared = match TreeStore::open_shared(&token) {
        Ok(store) => store,
        Err(error) => return Ok(report_store_error(&error)),
    };
    info!(files = shared.root().file_count(), "opened shared tree");

    match action {
        OpenAction::Show => ls::show_tree(session, &shared, path),
        OpenAction::Archive(output) => {
            let format = session.archive_format(None)?;
            archive::save(session, &shared, path, output, format).await
        }
        OpenAction::Import => import(session, &shared).await,
    }
}

async fn import(session: &Session, shared: &TreeStore) -> Result<ExitCode> {
    let mut local = session.load_store().await?;
    if let Err(error) = local.import_state(&shared.export_state()?) {
        return Ok(report_store_error(&error));
    }
    session.save_store(&local).await?;

    session.print(&ImportResult {
        path: session.state_path.display().to_string(),
        files: local.root().file_count(),
    })?;
    Ok(ExitCode::SUCCESS)
}
