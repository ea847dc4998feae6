//! Commands that show folders.
//!
//! `ls` lists one level, `tree` the whole subtree. Neither writes the
//! state file.

use super::common::{Session, report_store_error};
use crate::formatters;
use anyhow::Result;
use serde::Serialize;
use sharetree_core::cli::{ExitCode, OutputFormat};
use sharetree_store::{Folder, Node, TreePath, TreeStore, codec};

/// One child of a listed folder.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListEntry {
    /// Child name
    pub name: String,
    /// `folder`, or the file's content kind
    pub kind: String,
    /// Child count for folders, stored content bytes for files
    pub size: usize,
}

/// Listing of a folder's direct children.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Listing {
    /// Listed folder
    pub path: String,
    /// Children in display order
    pub entries: Vec<ListEntry>,
}

impl Listing {
    /// Builds a listing of `folder`.
    #[must_use]
    pub fn new(path: &TreePath, folder: &Folder) -> Self {
        let entries = folder
            .children()
            .map(|child| match child {
                Node::Folder(inner) => ListEntry {
                    name: inner.name().to_string(),
                    kind: "folder".to_string(),
                    size: inner.len(),
                },
                Node::File(file) => ListEntry {
                    name: file.name().to_string(),
                    kind: file.kind().as_str().to_string(),
                    size: file.size(),
                },
            })
            .collect();
        Self {
            path: path.to_string(),
            entries,
        }
    }
}

/// Runs the ls command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub async fn ls(session: &Session, path: &str) -> Result<ExitCode> {
    let store = session.load_store().await?;
    list(session, &store, path)
}

/// Lists a folder of an already loaded tree.
///
/// # Errors
///
/// Returns an error if the listing cannot be printed.
pub fn list(session: &Session, store: &TreeStore, path: &str) -> Result<ExitCode> {
    let path = TreePath::new(path);
    match store.locate(&path) {
        Ok(folder) => {
            session.print(&Listing::new(&path, folder))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => Ok(report_store_error(&error)),
    }
}

/// Runs the tree command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub async fn tree(session: &Session, path: &str) -> Result<ExitCode> {
    let store = session.load_store().await?;
    show_tree(session, &store, path)
}

/// Shows a subtree of an already loaded tree.
///
/// JSON output is the serialized state of the subtree.
///
/// # Errors
///
/// Returns an error if the subtree cannot be serialized.
pub fn show_tree(session: &Session, store: &TreeStore, path: &str) -> Result<ExitCode> {
    let path = TreePath::new(path);
    let folder = match store.locate(&path) {
        Ok(folder) => folder,
        Err(error) => return Ok(report_store_error(&error)),
    };

    let rendered = match session.format {
        OutputFormat::Json => codec::encode_tree_pretty(folder)?,
        OutputFormat::Text => formatters::tree::render(folder, false),
        OutputFormat::Pretty => formatters::tree::render(folder, true),
    };
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_entries() {
        let mut store = TreeStore::new();
        store.create_folder("/", "docs").unwrap();
        store.create_file("/docs", "a.txt", "abc", "text/plain").unwrap();
        store.create_file("/", "pic.png", "data:image/png;base64,QUJD", "image/png").unwrap();

        let listing = Listing::new(&TreePath::root(), store.root());

        assert_eq!(listing.path, "/");
        assert_eq!(
            listing.entries,
            vec![
                ListEntry {
                    name: "docs".to_string(),
                    kind: "folder".to_string(),
                    size: 1,
                },
                ListEntry {
                    name: "pic.png".to_string(),
                    kind: "image/png".to_string(),
                    size: 26,
                },
            ]
        );
    }
}
