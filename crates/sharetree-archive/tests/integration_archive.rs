//! Integration tests for folder archives.
//!
//! Archives are read back with `tar::Archive` and compared against the
//! tree they were built from.

use sharetree_archive::{ArchiveFormat, build_folder_archive, download};
use sharetree_store::TreeStore;
use std::io::Read;
use tempfile::TempDir;

fn build_tree() -> TreeStore {
    let mut store = TreeStore::new();
    store.create_folder("/", "project").unwrap();
    store.create_folder("/project", "src").unwrap();
    store.create_folder("/project", "empty").unwrap();
    store
        .create_file("/project", "README.md", "# Project\n", "text/markdown")
        .unwrap();
    store
        .create_file("/project/src", "main.rs", "fn main() {}\n", "text/x-rust")
        .unwrap();
    store
        .create_file("/project", "pic.png", "data:image/png;base64,QUJD", "image/png")
        .unwrap();
    store
}

fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(bytes);
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (path, data)
        })
        .collect()
}

/// One entry per file, at paths relative to the archived folder, with
/// image payloads decoded.
#[tokio::test]
async fn test_archive_matches_tree() {
    let store = build_tree();
    let blob = build_folder_archive(&store, "/project", ArchiveFormat::Tar)
        .await
        .unwrap();

    assert_eq!(blob.name, "project.tar");
    let entries = entries(&blob.bytes);
    assert_eq!(
        store.resolve_path("/project").unwrap().file_count(),
        entries.len()
    );
    assert_eq!(
        entries,
        vec![
            ("src/main.rs".to_string(), b"fn main() {}\n".to_vec()),
            ("README.md".to_string(), b"# Project\n".to_vec()),
            ("pic.png".to_string(), b"ABC".to_vec()),
        ]
    );
}

/// Archiving a subfolder does not include anything outside it.
#[tokio::test]
async fn test_subfolder_archive() {
    let store = build_tree();
    let blob = build_folder_archive(&store, "/project/src", ArchiveFormat::Tar)
        .await
        .unwrap();
    assert_eq!(blob.name, "src.tar");
    assert_eq!(entries(&blob.bytes), vec![("main.rs".to_string(), b"fn main() {}\n".to_vec())]);
}

/// Compressed archives decompress to the same tar stream.
#[tokio::test]
async fn test_tar_zst_archive() {
    let store = build_tree();
    let plain = build_folder_archive(&store, "/project", ArchiveFormat::Tar)
        .await
        .unwrap();
    let compressed = build_folder_archive(&store, "/project", ArchiveFormat::TarZst { level: 19 })
        .await
        .unwrap();

    assert_eq!(compressed.name, "project.tar.zst");
    let decompressed = zstd::decode_all(compressed.bytes.as_slice()).unwrap();
    assert_eq!(decompressed, plain.bytes);
}

/// A missing folder fails distinctly from a folder with no files.
#[tokio::test]
async fn test_missing_folder_fails() {
    let store = build_tree();
    let err = build_folder_archive(&store, "/project/nope", ArchiveFormat::Tar)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let empty = build_folder_archive(&store, "/project/empty", ArchiveFormat::Tar)
        .await
        .unwrap();
    assert!(entries(&empty.bytes).is_empty());
}

/// An archive unpacks onto disk with the tree's layout.
#[tokio::test]
async fn test_unpack_to_disk() {
    let store = build_tree();
    let blob = download(&store, "/", ArchiveFormat::Tar).await.unwrap();
    assert_eq!(blob.name, "root.tar");

    let temp = TempDir::new().unwrap();
    tar::Archive::new(blob.bytes.as_slice())
        .unpack(temp.path())
        .unwrap();

    let main = std::fs::read_to_string(temp.path().join("project/src/main.rs")).unwrap();
    assert_eq!(main, "fn main() {}\n");
    assert_eq!(std::fs::read(temp.path().join("project/pic.png")).unwrap(), b"ABC");
}
