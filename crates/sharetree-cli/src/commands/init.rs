//! Init command implementation.
//!
//! Writes an empty tree to the state file.

use super::common::Session;
use anyhow::{Result, bail};
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::TreeStore;
use tracing::info;

/// Result of initializing a state file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// State file that was written
    pub path: String,
    /// Whether an existing file was replaced
    pub replaced: bool,
}

/// Runs the init command.
///
/// # Errors
///
/// Returns an error if the state file exists and `force` is not set, or
/// if it cannot be written.
pub async fn run(session: &Session, force: bool) -> Result<ExitCode> {
    let exists = tokio::fs::try_exists(&session.state_path)
        .await
        .unwrap_or(false);
    if exists && !force {
        bail!(
            "state file already exists at {} (use --force to replace it)",
            session.state_path.display()
        );
    }

    session.save_store(&TreeStore::new()).await?;
    info!(path = %session.state_path.display(), "initialized tree state");

    session.print(&InitResult {
        path: session.state_path.display().to_string(),
        replaced: exists,
    })?;
    Ok(ExitCode::SUCCESS)
}
