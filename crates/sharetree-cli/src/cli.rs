//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::actions::ConfigAction;

/// Sharetree - a shareable in-memory file tree.
///
/// Keeps a tree of folders and files in a JSON state file, shares it as a
/// read-only link and packs folders into tar archives.
#[derive(Parser, Debug)]
#[command(name = "sharetree")]
#[command(version, about, long_about = None)]
#[command(author = "Sharetree Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Tree state file (defaults to the configured or platform data path)
    #[arg(long, global = true, env = "SHARETREE_STATE")]
    pub state: Option<PathBuf>,

    /// Configuration file (defaults to the platform config path)
    #[arg(long, global = true, env = "SHARETREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty); defaults to the configured one
    #[arg(long = "format", global = true)]
    pub format: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty tree state file.
    Init {
        /// Replace an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Create a folder.
    ///
    /// # Examples
    ///
    /// ```bash
    /// sharetree mkdir /docs
    /// sharetree mkdir /docs/drafts
    /// ```
    Mkdir {
        /// Path of the new folder
        path: String,
    },

    /// Create a file, empty unless content is given.
    ///
    /// An existing item with the same name is replaced.
    Touch {
        /// Path of the new file
        path: String,

        /// Text content of the file
        #[arg(short, long)]
        content: Option<String>,

        /// Content kind (MIME-like, `image/*` means base64 data);
        /// `text/plain` when content is given
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Rename a file or folder in place.
    Rename {
        /// Path of the item to rename
        path: String,

        /// New name (not a path)
        new_name: String,
    },

    /// List the children of a folder.
    Ls {
        /// Folder to list
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show a folder and everything beneath it.
    Tree {
        /// Folder to show
        #[arg(default_value = "/")]
        path: String,
    },

    /// Print a file's content.
    Cat {
        /// File to print
        path: String,
    },

    /// Add local files to a folder.
    ///
    /// Images are stored as base64 data, everything else as text. Files
    /// that cannot be read are reported and skipped.
    ///
    /// # Examples
    ///
    /// ```bash
    /// sharetree add notes.md photo.png --to /docs
    /// ```
    Add {
        /// Files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination folder
        #[arg(long, default_value = "/")]
        to: String,
    },

    /// Move a file or folder into another folder.
    Mv {
        /// Item to move
        source: String,

        /// Destination folder
        target: String,
    },

    /// Copy a file or folder into another folder.
    Cp {
        /// Item to copy
        source: String,

        /// Destination folder
        target: String,
    },

    /// Save a folder as an archive, or a file as its raw bytes.
    Archive {
        /// Folder or file to save
        #[arg(default_value = "/")]
        path: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Archive format (tar, tar.zst); defaults to the configured one
        #[arg(long)]
        archive_format: Option<String>,
    },

    /// Print a read-only share link for the whole tree.
    Share {
        /// Base URL to build the link on
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Open a share link as a read-only tree.
    ///
    /// Shows the shared tree, saves part of it as an archive, or imports
    /// it into the local state file.
    ///
    /// # Examples
    ///
    /// ```bash
    /// sharetree open "https://sharetree.local/?share=JTdCJTIy..."
    /// sharetree open "$LINK" --path /docs --archive --output ./downloads
    /// sharetree open "$LINK" --import
    /// ```
    Open {
        /// Share link or bare token
        link: String,

        /// Folder or file inside the shared tree
        #[arg(long, default_value = "/")]
        path: String,

        /// Save `path` as an archive instead of showing it
        #[arg(long, conflicts_with = "import")]
        archive: bool,

        /// Directory to write the archive into
        #[arg(short, long, default_value = ".", requires = "archive")]
        output: PathBuf,

        /// Replace the local tree with the shared one
        #[arg(long)]
        import: bool,
    },

    /// Manage CLI configuration.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    ///
    /// # Examples
    ///
    /// ```bash
    /// sharetree completions bash > /etc/bash_completion.d/sharetree
    /// ```
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
