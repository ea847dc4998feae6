//! Action type definitions for CLI commands.
//!
//! Defines the action enums used by commands with their own subcommands.

use clap::Subcommand;

/// Configuration management actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}
