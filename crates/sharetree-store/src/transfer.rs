//! Moving and copying items between folders.
//!
//! Items are rebuilt at the destination through the store's own
//! `create_folder` / `create_file` calls, so the copy never shares nodes with
//! the original. A move detaches the original before rebuilding it, so an
//! item that replaces one of the source's ancestors cannot take the source
//! down with it. A transfer that fails part way restores the previous tree.
//!
//! # Examples
//!
//! ```
//! use sharetree_store::{TreeStore, transfer};
//!
//! let mut store = TreeStore::new();
//! store.create_folder("/", "inbox").unwrap();
//! store.create_folder("/", "archive").unwrap();
//! store.create_file("/inbox", "note.txt", "hi", "text/plain").unwrap();
//!
//! transfer::move_item(&mut store, "/inbox", "note.txt", "/archive").unwrap();
//!
//! assert!(store.file("/inbox/note.txt").is_none());
//! assert_eq!(store.file("/archive/note.txt").unwrap().content(), "hi");
//! ```

use crate::node::Node;
use crate::store::TreeStore;
use crate::types::{Result, StoreError, TreePath, check_depth};
use tracing::{debug, warn};

/// Moves the child `name` of `source_parent` into `target`.
///
/// Moving within the same folder is a no-op. An item in `target` with the
/// same name is replaced, even when it is an ancestor of the moved item.
///
/// # Errors
///
/// Fails if the store is read-only, the item or target folder does not
/// exist, the target lies inside the item being moved, or the result would
/// nest folders deeper than [`MAX_DEPTH`](crate::MAX_DEPTH). The tree is
/// unchanged on failure.
pub fn move_item(
    store: &mut TreeStore,
    source_parent: impl AsRef<str>,
    name: &str,
    target: impl AsRef<str>,
) -> Result<()> {
    let source_parent = TreePath::new(source_parent);
    let target = TreePath::new(target);
    if prepare(store, "move", &source_parent, name, &target)?.is_none() {
        return Ok(());
    }
    all_or_nothing(store, |store| {
        let node = store.remove(&source_parent, name)?;
        rebuild(store, &target, &node)
    })?;
    debug!(from = %source_parent, to = %target, name, "moved item");
    Ok(())
}

/// Copies the child `name` of `source_parent` into `target`.
///
/// Copying within the same folder is a no-op.
///
/// # Errors
///
/// Fails if the store is read-only, the item or target folder does not
/// exist, the target lies inside the item being copied, or the copy would
/// nest folders deeper than [`MAX_DEPTH`](crate::MAX_DEPTH). The tree is
/// unchanged on failure.
pub fn copy_item(
    store: &mut TreeStore,
    source_parent: impl AsRef<str>,
    name: &str,
    target: impl AsRef<str>,
) -> Result<()> {
    let source_parent = TreePath::new(source_parent);
    let target = TreePath::new(target);
    let Some(node) = prepare(store, "copy", &source_parent, name, &target)? else {
        return Ok(());
    };
    all_or_nothing(store, |store| rebuild(store, &target, &node))?;
    debug!(from = %source_parent, to = %target, name, "copied item");
    Ok(())
}

/// Validates a transfer and snapshots the source node.
///
/// Returns `None` when source and target folders are the same.
fn prepare(
    store: &TreeStore,
    operation: &'static str,
    source_parent: &TreePath,
    name: &str,
    target: &TreePath,
) -> Result<Option<Node>> {
    if store.is_read_only() {
        return Err(StoreError::ReadOnly { operation });
    }
    let source_path = source_parent.join(name);
    let node = store
        .locate(source_parent)?
        .child(name)
        .cloned()
        .ok_or_else(|| StoreError::NotFound {
            path: source_path.to_string(),
        })?;
    store.locate(target)?;

    if source_parent == target {
        return Ok(None);
    }
    if let Node::Folder(folder) = &node {
        if target.is_within(&source_path) {
            return Err(StoreError::InvalidTransfer {
                source_path: source_path.to_string(),
                target: target.to_string(),
            });
        }
        check_depth(target, folder.depth() + 1)?;
    }
    Ok(Some(node))
}

/// Runs a multi-step mutation, putting the previous root back if it fails.
fn all_or_nothing<F>(store: &mut TreeStore, mutate: F) -> Result<()>
where
    F: FnOnce(&mut TreeStore) -> Result<()>,
{
    let saved = store.root().clone();
    mutate(&mut *store).inspect_err(|e| {
        warn!(error = %e, "transfer failed, restoring tree");
        store.restore_root(saved);
    })
}

fn rebuild(store: &mut TreeStore, target: &TreePath, node: &Node) -> Result<()> {
    match node {
        Node::File(file) => {
            store.create_file(target, file.name(), file.content(), file.kind().clone())
        }
        Node::Folder(folder) => {
            store.create_folder(target, folder.name())?;
            let inner = target.join(folder.name());
            for child in folder.children() {
                rebuild(store, &inner, child)?;
            }
            Ok(())
        }
    }
}
