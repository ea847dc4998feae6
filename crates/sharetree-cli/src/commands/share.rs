//! Share command implementation.
//!
//! Encodes the whole tree into a link that opens it read-only.

use super::common::{Session, report_store_error};
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::ExitCode;
use sharetree_store::share;

/// A generated share link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShareLink {
    /// Full link
    pub url: String,
    /// Token carried by the link
    pub token: String,
}

/// Builds the share link for a tree token.
#[must_use]
pub fn build_link(session: &Session, base_url: Option<&str>, token: String) -> ShareLink {
    let base = base_url.unwrap_or(session.config.share.base_url.as_str());
    ShareLink {
        url: share::share_url(base, &session.config.share.query_param, &token),
        token,
    }
}

/// Runs the share command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub async fn run(session: &Session, base_url: Option<&str>) -> Result<ExitCode> {
    let store = session.load_store().await?;
    let token = match store.share_token() {
        Ok(token) => token,
        Err(error) => return Ok(report_store_error(&error)),
    };
    session.print(&build_link(session, base_url, token))?;
    Ok(ExitCode::SUCCESS)
}
