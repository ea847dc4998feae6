//! Turning external content into tree files.
//!
//! A [`ContentSource`] supplies a display name, a MIME-like kind and raw
//! bytes. [`ingest_batch`] converts each source into the stored form
//! (a `data:` reference for binary kinds, UTF-8 text otherwise) and creates
//! the file. Sources are processed one at a time and independently: a
//! failing source is recorded and the rest of the batch continues.
//!
//! # Examples
//!
//! ```
//! use sharetree_store::TreeStore;
//! use sharetree_store::ingest::{MemorySource, ingest_batch};
//!
//! # block_on(async {
//! let mut store = TreeStore::new();
//! let sources = vec![
//!     MemorySource::new("a.txt", "text/plain", b"hello".to_vec()),
//!     MemorySource::new("b.png", "image/png", b"ABC".to_vec()),
//! ];
//!
//! let report = ingest_batch(&mut store, &sources, "/").await;
//! assert!(report.is_complete());
//! assert_eq!(store.file("/b.png").unwrap().content(), "data:image/png;base64,QUJD");
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use crate::node::ContentKind;
use crate::store::TreeStore;
use crate::types::{StoreError, TreePath};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Kind used when nothing better is known.
const FALLBACK_MIME: &str = "application/octet-stream";

/// A source of external file content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Name the created file will have.
    fn name(&self) -> &str;

    /// MIME-like kind of the content.
    fn mime(&self) -> &str;

    /// Reads the raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the content cannot be read.
    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

/// A file on the local disk.
///
/// The kind is inferred from the file extension.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    mime: String,
}

impl LocalFile {
    /// Creates a source for `path`, named after its final component.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_for_path(&path).to_string();
        Self { path, name, mime }
    }

    /// Returns the path on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mime(&self) -> &str {
        (**self).mime()
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        (**self).read().await
    }
}

#[async_trait]
impl ContentSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime(&self) -> &str {
        &self.mime
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Content already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Creates an in-memory source.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime(&self) -> &str {
        &self.mime
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A source that could not be ingested.
#[derive(Debug)]
pub struct IngestFailure {
    /// Name of the failed source
    pub name: String,
    /// Why it failed
    pub error: StoreError,
}

/// Outcome of a batch ingestion.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Paths of the files that were created
    pub created: Vec<TreePath>,
    /// Sources that were skipped
    pub failed: Vec<IngestFailure>,
}

impl IngestReport {
    /// Returns `true` if every source was ingested.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts raw bytes into the stored content form for `kind`.
///
/// # Examples
///
/// ```
/// use sharetree_store::ContentKind;
/// use sharetree_store::ingest::encode_content;
///
/// assert_eq!(encode_content(&ContentKind::from("image/gif"), b"ABC"), "data:image/gif;base64,QUJD");
/// assert_eq!(encode_content(&ContentKind::from("text/plain"), b"hi"), "hi");
/// ```
#[must_use]
pub fn encode_content(kind: &ContentKind, bytes: &[u8]) -> String {
    match kind {
        ContentKind::Binary(mime) => format!("data:{mime};base64,{}", BASE64.encode(bytes)),
        ContentKind::Text(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Ingests every source into the folder at `target`.
///
/// Each source is read and created independently. Failures (unreadable
/// content, read-only store, missing target, invalid name) are collected
/// in the report instead of aborting the batch.
pub async fn ingest_batch<S: ContentSource>(
    store: &mut TreeStore,
    sources: &[S],
    target: impl AsRef<str>,
) -> IngestReport {
    let target = TreePath::new(target);
    let mut report = IngestReport::default();

    for source in sources {
        match ingest_one(store, source, &target).await {
            Ok(()) => {
                debug!(name = source.name(), target = %target, "ingested content");
                report.created.push(target.join(source.name()));
            }
            Err(error) => {
                warn!(name = source.name(), error = %error, "skipping content source");
                report.failed.push(IngestFailure {
                    name: source.name().to_string(),
                    error,
                });
            }
        }
    }
    report
}

async fn ingest_one<S: ContentSource>(
    store: &mut TreeStore,
    source: &S,
    target: &TreePath,
) -> Result<(), StoreError> {
    if store.is_read_only() {
        return Err(StoreError::ReadOnly { operation: "ingest" });
    }
    let bytes = source.read().await.map_err(|e| StoreError::Io {
        name: source.name().to_string(),
        source: e,
    })?;
    let kind = ContentKind::from(source.mime());
    let content = encode_content(&kind, &bytes);
    store.create_file(target, source.name(), content, kind)
}

/// Infers a MIME-like kind from a file extension.
///
/// # Examples
///
/// ```
/// use sharetree_store::ingest::mime_for_path;
/// use std::path::Path;
///
/// assert_eq!(mime_for_path(Path::new("cat.PNG")), "image/png");
/// assert_eq!(mime_for_path(Path::new("notes.md")), "text/markdown");
/// assert_eq!(mime_for_path(Path::new("blob")), "application/octet-stream");
/// ```
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "rs" => "text/x-rust",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    struct Broken;

    #[async_trait]
    impl ContentSource for Broken {
        fn name(&self) -> &str {
            "broken.txt"
        }

        fn mime(&self) -> &str {
            "text/plain"
        }

        async fn read(&self) -> io::Result<Vec<u8>> {
            Err(io::Error::other("device gone"))
        }
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let mut store = TreeStore::new();
        let sources: Vec<Box<dyn ContentSource>> = vec![
            Box::new(MemorySource::new("a.txt", "text/plain", b"a".to_vec())),
            Box::new(Broken),
            Box::new(MemorySource::new("c.txt", "text/plain", b"c".to_vec())),
        ];

        let report = ingest_batch(&mut store, &sources, "/").await;

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "broken.txt");
        assert!(store.file("/a.txt").is_some());
        assert!(store.file("/c.txt").is_some());
        assert!(store.file("/broken.txt").is_none());
    }

    #[tokio::test]
    async fn test_read_only_fails_every_item() {
        let mut store = TreeStore::new();
        store.set_read_only(true);
        let sources = vec![
            MemorySource::new("a", "text/plain", vec![]),
            MemorySource::new("b", "text/plain", vec![]),
        ];

        let report = ingest_batch(&mut store, &sources, "/").await;

        assert!(report.created.is_empty());
        assert!(report.failed.iter().all(|f| f.error.is_read_only()));
    }

    #[tokio::test]
    async fn test_missing_target_fails() {
        let mut store = TreeStore::new();
        let sources = vec![MemorySource::new("a", "text/plain", vec![])];
        let report = ingest_batch(&mut store, &sources, "/nope").await;
        assert!(report.failed[0].error.is_not_found());
    }

    #[tokio::test]
    async fn test_local_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let text_path = temp.path().join("notes.txt");
        let image_path = temp.path().join("dot.png");
        std::fs::write(&text_path, "line one\n").unwrap();
        std::fs::write(&image_path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut store = TreeStore::new();
        store.create_folder("/", "up").unwrap();
        let sources = vec![LocalFile::new(&text_path), LocalFile::new(&image_path)];
        let report = ingest_batch(&mut store, &sources, "/up").await;

        assert!(report.is_complete());
        assert_eq!(store.file("/up/notes.txt").unwrap().content(), "line one\n");
        let image = store.file("/up/dot.png").unwrap();
        assert_eq!(image.kind().as_str(), "image/png");
        assert_eq!(image.payload_bytes().unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_local_file_missing() {
        let temp = TempDir::new().unwrap();
        let mut store = TreeStore::new();
        let sources = vec![LocalFile::new(temp.path().join("absent.txt"))];
        let report = ingest_batch(&mut store, &sources, "/").await;
        assert!(matches!(report.failed[0].error, StoreError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_text_is_lossy() {
        let content = encode_content(&ContentKind::from("text/plain"), &[b'a', 0xff]);
        assert_eq!(content, "a\u{fffd}");
    }
}
