//! Config command implementation.
//!
//! Writes and shows the TOML configuration file.

use crate::actions::ConfigAction;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use sharetree_core::Config;
use sharetree_core::cli::{ExitCode, OutputFormat};
use std::path::Path;
use tracing::info;

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub written: bool,
    /// Status message
    pub message: String,
    /// Configuration file path
    pub path: String,
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or written.
pub async fn run(action: ConfigAction, path: &Path, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Config action: {:?}", action);

    match action {
        ConfigAction::Init { force } => init_config(path, force, output_format),
        ConfigAction::Show => show_config(path, output_format),
    }
}

/// Writes a default configuration file.
///
/// An existing file is kept unless `force` is set.
fn init_config(path: &Path, force: bool, output_format: OutputFormat) -> Result<ExitCode> {
    let result = if path.exists() && !force {
        InitResult {
            written: false,
            message: "configuration file already exists (use --force to overwrite)".to_string(),
            path: path.display().to_string(),
        }
    } else {
        Config::default()
            .save(path)
            .context("failed to write configuration")?;
        InitResult {
            written: true,
            message: "configuration file created with default values".to_string(),
            path: path.display().to_string(),
        }
    };

    let formatted =
        format_output(&result, output_format).context("failed to format init result")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

/// Shows the effective configuration.
///
/// Text output is the TOML file content.
fn show_config(path: &Path, output_format: OutputFormat) -> Result<ExitCode> {
    let config = Config::load(path).context("failed to load configuration")?;

    let formatted = match output_format {
        OutputFormat::Text => config.to_toml()?,
        OutputFormat::Json | OutputFormat::Pretty => {
            format_output(&config, output_format).context("failed to format configuration")?
        }
    };
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
