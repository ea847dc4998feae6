//! Common utilities shared across CLI commands.
//!
//! A [`Session`] carries the resolved configuration, state file and output
//! format. Commands load the tree from the state file, apply one
//! operation and write it back.

use crate::formatters::format_output;
use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use serde::Serialize;
use sharetree_archive::{ArchiveError, ArchiveFormat};
use sharetree_core::Config;
use sharetree_core::cli::{ExitCode, OutputFormat};
use sharetree_store::{StoreError, TreePath, TreeStore};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolved settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Effective configuration
    pub config: Config,
    /// Tree state file
    pub state_path: PathBuf,
    /// Output format for results
    pub format: OutputFormat,
}

impl Session {
    /// Builds a session from configuration and command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if no state path can be determined or the output
    /// format is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_cli::commands::common::Session;
    /// use sharetree_core::Config;
    /// use sharetree_core::cli::OutputFormat;
    /// use std::path::PathBuf;
    ///
    /// let session = Session::new(Config::default(), Some(PathBuf::from("t.json")), Some("json")).unwrap();
    /// assert_eq!(session.format, OutputFormat::Json);
    /// ```
    pub fn new(config: Config, state: Option<PathBuf>, format: Option<&str>) -> Result<Self> {
        let state_path = match state {
            Some(path) => path,
            None => config.state_path()?,
        };
        let format = format
            .unwrap_or(config.general.default_format.as_str())
            .parse::<OutputFormat>()?;
        Ok(Self {
            config,
            state_path,
            format,
        })
    }

    /// Loads the tree from the state file.
    ///
    /// A missing state file yields an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be checked or read, or does not
    /// hold a tree.
    pub async fn load_store(&self) -> Result<TreeStore> {
        let exists = tokio::fs::try_exists(&self.state_path)
            .await
            .with_context(|| format!("failed to check {}", self.state_path.display()))?;
        if !exists {
            debug!(path = %self.state_path.display(), "state file not found, starting empty");
            return Ok(TreeStore::new());
        }
        let text = tokio::fs::read_to_string(&self.state_path)
            .await
            .with_context(|| format!("failed to read {}", self.state_path.display()))?;
        TreeStore::from_state(&text)
            .with_context(|| format!("failed to load tree from {}", self.state_path.display()))
    }

    /// Writes the tree to the state file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be exported or the file written.
    pub async fn save_store(&self, store: &TreeStore) -> Result<()> {
        let state = store.export_state()?;
        if let Some(parent) = self.state_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.state_path, state)
            .await
            .with_context(|| format!("failed to write {}", self.state_path.display()))?;
        debug!(path = %self.state_path.display(), "saved tree state");
        Ok(())
    }

    /// Resolves the archive format, preferring `requested` over the
    /// configured one.
    ///
    /// # Errors
    ///
    /// Returns an error if the format name is unknown.
    pub fn archive_format(&self, requested: Option<&str>) -> Result<ArchiveFormat> {
        let name = requested.unwrap_or(self.config.archive.format.as_str());
        let format = name.parse::<ArchiveFormat>().map_err(|e| anyhow!(e))?;
        Ok(format.with_level(self.config.archive.compression_level))
    }

    /// Prints a command result in the session's output format.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized.
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", format_output(data, self.format)?);
        Ok(())
    }
}

/// Splits an item path into its parent folder and name.
///
/// # Errors
///
/// Returns an error for the root path, which has no name.
///
/// # Examples
///
/// ```
/// use sharetree_cli::commands::common::split_path;
///
/// let (parent, name) = split_path("/docs/a.txt").unwrap();
/// assert_eq!(parent.as_str(), "/docs");
/// assert_eq!(name, "a.txt");
/// assert!(split_path("/").is_err());
/// ```
pub fn split_path(path: &str) -> Result<(TreePath, String)> {
    let path = TreePath::new(path);
    match (path.parent(), path.name()) {
        (Some(parent), Some(name)) => Ok((parent, name.to_string())),
        _ => bail!("'{path}' names the root folder, expected an item path"),
    }
}

/// Maps a tree error to its exit code.
#[must_use]
pub const fn store_exit_code(error: &StoreError) -> ExitCode {
    if error.is_not_found() {
        ExitCode::NOT_FOUND
    } else if error.is_read_only() {
        ExitCode::READ_ONLY
    } else if error.is_invalid_name()
        || error.is_malformed()
        || error.is_too_deep()
        || matches!(error, StoreError::InvalidTransfer { .. })
    {
        ExitCode::INVALID_INPUT
    } else {
        ExitCode::ERROR
    }
}

/// Maps an archive error to its exit code.
#[must_use]
pub const fn archive_exit_code(error: &ArchiveError) -> ExitCode {
    if error.is_not_found() {
        ExitCode::NOT_FOUND
    } else if error.is_invalid_payload() {
        ExitCode::INVALID_INPUT
    } else {
        ExitCode::ERROR
    }
}

/// Reports a rejected operation on stderr and returns its exit code.
pub fn report_store_error(error: &StoreError) -> ExitCode {
    warn!(error = %error, "operation rejected");
    eprintln!("{} {error}", "error:".red().bold());
    store_exit_code(error)
}

/// Reports a failed archive build on stderr and returns its exit code.
pub fn report_archive_error(error: &ArchiveError) -> ExitCode {
    warn!(error = %error, "archive failed");
    eprintln!("{} {error}", "error:".red().bold());
    archive_exit_code(error)
}

/// Writes `bytes` to `dir/name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub async fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
