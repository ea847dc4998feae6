//! Sharetree CLI.
//!
//! Command-line front end for an in-memory file tree persisted as a JSON
//! state file.
//!
//! # Examples
//!
//! ```bash
//! sharetree mkdir /docs
//! sharetree add notes.md photo.png --to /docs
//! sharetree tree
//! sharetree archive /docs --output ./out
//! sharetree share
//! sharetree open "$LINK" --path /docs
//! ```

use anyhow::Result;
use clap::Parser;
use sharetree_cli::cli::Cli;
use sharetree_cli::runner::{execute_command, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let exit_code = execute_command(cli).await?;

    std::process::exit(exit_code.as_i32());
}
