//! Move and copy commands.

use super::common::{Session, report_store_error, split_path};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::{TreePath, transfer};
use tracing::info;

/// Whether the source is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Remove the source after copying
    Move,
    /// Keep the source
    Copy,
}

impl TransferMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "moved",
            Self::Copy => "copied",
        }
    }
}

/// Result of a move or copy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransferResult {
    /// `moved` or `copied`
    pub action: &'static str,
    /// Original item path
    pub from: String,
    /// Item path at the destination
    pub to: String,
}

/// Moves or copies `source` into the folder `target`.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub async fn run(session: &Session, mode: TransferMode, source: &str, target: &str) -> Result<ExitCode> {
    let (parent, name) = split_path(source)?;
    let target = TreePath::new(target);
    let mut store = session.load_store().await?;

    let outcome = match mode {
        TransferMode::Move => transfer::move_item(&mut store, &parent, &name, &target),
        TransferMode::Copy => transfer::copy_item(&mut store, &parent, &name, &target),
    };
    if let Err(error) = outcome {
        return Ok(report_store_error(&error));
    }
    session.save_store(&store).await?;

    let result = TransferResult {
        action: mode.as_str(),
        from: parent.join(&name).to_string(),
        to: target.join(&name).to_string(),
    };
    info!(action = result.action, from = %result.from, to = %result.to, "transfer complete");
    session.print(&result)?;
    Ok(ExitCode::SUCCESS)
}
