//! Command execution and runtime logic.
//!
//! Contains logging initialization and the dispatch from parsed arguments
//! to command handlers.

use anyhow::Result;
use clap::CommandFactory;
use sharetree_core::Config;
use sharetree_core::cli::{ExitCode, OutputFormat};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands;
use crate::commands::common::Session;
use crate::commands::open::OpenAction;
use crate::commands::transfer::TransferMode;

/// Initializes logging infrastructure.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, falling
/// back to info. Logs go to stderr so command output stays parseable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Executes the parsed command line.
///
/// `completions` and `config` run without loading the configuration, so a
/// broken config file can still be replaced.
///
/// # Errors
///
/// Returns an error if configuration, the state file or output fails.
pub async fn execute_command(cli: Cli) -> Result<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
        Commands::Config { action } => {
            let format = cli
                .format
                .as_deref()
                .map_or(Ok(OutputFormat::default()), str::parse::<OutputFormat>)?;
            commands::config::run(action, &config_path, format).await
        }
        command => {
            let config = Config::load(&config_path)?;
            let session = Session::new(config, cli.state, cli.format.as_deref())?;
            debug!(state = %session.state_path.display(), format = %session.format, "session ready");
            dispatch(command, &session).await
        }
    }
}

/// Routes a tree command to its handler.
///
/// # Errors
///
/// Returns an error if the command fails outside of the tree operation
/// itself (I/O, serialization, configuration).
pub async fn dispatch(command: Commands, session: &Session) -> Result<ExitCode> {
    match command {
        Commands::Init { force } => commands::init::run(session, force).await,
        Commands::Mkdir { path } => commands::edit::mkdir(session, &path).await,
        Commands::Touch {
            path,
            content,
            kind,
        } => commands::edit::touch(session, &path, content, kind).await,
        Commands::Rename { path, new_name } => {
            commands::edit::rename(session, &path, &new_name).await
        }
        Commands::Ls { path } => commands::ls::ls(session, &path).await,
        Commands::Tree { path } => commands::ls::tree(session, &path).await,
        Commands::Cat { path } => commands::cat::run(session, &path).await,
        Commands::Add { files, to } => commands::add::run(session, files, &to).await,
        Commands::Mv { source, target } => {
            commands::transfer::run(session, TransferMode::Move, &source, &target).await
        }
        Commands::Cp { source, target } => {
            commands::transfer::run(session, TransferMode::Copy, &source, &target).await
        }
        Commands::Archive {
            path,
            output,
            archive_format,
        } => commands::archive::run(session, &path, &output, archive_format.as_deref()).await,
        Commands::Share { base_url } => commands::share::run(session, base_url.as_deref()).await,
        Commands::Open {
            link,
            path,
            archive,
            output,
            import,
        } => {
            let action = if import {
                OpenAction::Import
            } else if archive {
                OpenAction::Archive(&output)
            } else {
                OpenAction::Show
            };
            commands::open::run(session, &link, &path, action).await
        }
        Commands::Config { .. } | Commands::Completions { .. } => {
            anyhow::bail!("command does not operate on a tree")
        }
    }
}
