//! Flattening a folder into archive entries.

use crate::error::{ArchiveError, Result};
use sharetree_store::{Folder, Node};

/// One file destined for an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the archived folder, `/`-separated
    pub path: String,
    /// Decoded file bytes
    pub data: Vec<u8>,
}

/// Collects every file under `folder` in pre-order.
///
/// Paths are relative to `folder` and do not include its own name. Binary
/// payloads are decoded; text content is taken verbatim. Folders with no
/// files contribute nothing.
///
/// # Errors
///
/// Returns `ArchiveError::InvalidPayload` if a binary payload is not valid
/// base64.
///
/// # Examples
///
/// ```
/// use sharetree_archive::collect_entries;
/// use sharetree_store::TreeStore;
///
/// let mut store = TreeStore::new();
/// store.create_folder("/", "a").unwrap();
/// store.create_file("/a", "b.txt", "hi", "text/plain").unwrap();
/// store.create_file("/", "pic.png", "data:image/png;base64,QUJD", "image/png").unwrap();
///
/// let entries = collect_entries(store.root()).unwrap();
/// assert_eq!(entries[0].path, "a/b.txt");
/// assert_eq!(entries[1].data, b"ABC");
/// ```
pub fn collect_entries(folder: &Folder) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::with_capacity(folder.file_count());
    walk(folder, "", &mut entries)?;
    Ok(entries)
}

fn walk(folder: &Folder, prefix: &str, entries: &mut Vec<ArchiveEntry>) -> Result<()> {
    for child in folder.children() {
        let path = if prefix.is_empty() {
            child.name().to_string()
        } else {
            format!("{prefix}/{}", child.name())
        };
        match child {
            Node::Folder(inner) => walk(inner, &path, entries)?,
            Node::File(file) => {
                let data = file
                    .payload_bytes()
                    .map_err(|source| ArchiveError::InvalidPayload {
                        path: path.clone(),
                        source,
                    })?;
                entries.push(ArchiveEntry { path, data });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharetree_store::TreeStore;

    #[test]
    fn test_entries_in_preorder() {
        let mut store = TreeStore::new();
        store.create_file("/", "first.txt", "1", "text/plain").unwrap();
        store.create_folder("/", "dir").unwrap();
        store.create_folder("/dir", "sub").unwrap();
        store.create_file("/dir/sub", "deep.txt", "3", "text/plain").unwrap();
        store.create_file("/dir", "mid.txt", "2", "text/plain").unwrap();
        store.create_file("/", "last.txt", "4", "text/plain").unwrap();

        let paths: Vec<_> = collect_entries(store.root())
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();

        assert_eq!(
            paths,
            vec!["first.txt", "dir/sub/deep.txt", "dir/mid.txt", "last.txt"]
        );
    }

    #[test]
    fn test_empty_folders_contribute_nothing() {
        let mut store = TreeStore::new();
        store.create_folder("/", "empty").unwrap();
        store.create_folder("/empty", "deeper").unwrap();
        assert!(collect_entries(store.root()).unwrap().is_empty());
    }

    #[test]
    fn test_text_is_not_decoded() {
        let mut store = TreeStore::new();
        store
            .create_file("/", "looks-like-data.txt", "data:x;base64,QUJD", "text/plain")
            .unwrap();
        let entries = collect_entries(store.root()).unwrap();
        assert_eq!(entries[0].data, b"data:x;base64,QUJD");
    }

    #[test]
    fn test_bad_payload_names_the_file() {
        let mut store = TreeStore::new();
        store.create_folder("/", "img").unwrap();
        store
            .create_file("/img", "broken.png", "data:image/png;base64,!!!", "image/png")
            .unwrap();

        let err = collect_entries(store.root()).unwrap_err();
        match err {
            ArchiveError::InvalidPayload { path, .. } => assert_eq!(path, "img/broken.png"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
