//! Downloadable blobs for folders and single files.

use crate::entry::collect_entries;
use crate::error::{ArchiveError, Result};
use crate::pack::{ArchiveFormat, pack};
use sharetree_store::{File, TreePath, TreeStore};
use tracing::debug;

/// MIME type given to text files.
const TEXT_MIME: &str = "text/plain";

/// Named bytes ready to be saved or sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    /// Suggested file name
    pub name: String,
    /// MIME type of `bytes`
    pub mime: String,
    /// Payload
    pub bytes: Vec<u8>,
}

impl NamedBlob {
    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds an archive of the folder at `path`.
///
/// The blob is named `<folder name>.<extension>`; the root folder is
/// named `root`. Packing runs on the blocking thread pool.
///
/// # Errors
///
/// Returns `ArchiveError::FolderNotFound` if `path` does not resolve to a
/// folder, `ArchiveError::InvalidPayload` if a binary file cannot be
/// decoded, and a write or task error if packing fails.
///
/// # Examples
///
/// ```
/// use sharetree_archive::{ArchiveFormat, build_folder_archive};
/// use sharetree_store::TreeStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut store = TreeStore::new();
/// store.create_folder("/", "docs").unwrap();
/// store.create_file("/docs", "a.txt", "hi", "text/plain").unwrap();
///
/// let blob = build_folder_archive(&store, "/docs", ArchiveFormat::Tar).await.unwrap();
/// assert_eq!(blob.name, "docs.tar");
///
/// assert!(build_folder_archive(&store, "/nope", ArchiveFormat::Tar).await.is_err());
/// # });
/// ```
pub async fn build_folder_archive(
    store: &TreeStore,
    path: impl AsRef<str>,
    format: ArchiveFormat,
) -> Result<NamedBlob> {
    let path = TreePath::new(path);
    let folder = store
        .resolve_path(&path)
        .ok_or_else(|| ArchiveError::FolderNotFound {
            path: path.to_string(),
        })?;

    let entries = collect_entries(folder)?;
    let name = format!("{}.{}", folder.name(), format.extension());
    let count = entries.len();

    let bytes = tokio::task::spawn_blocking(move || pack(&entries, format)).await??;

    debug!(path = %path, entries = count, size = bytes.len(), "built archive");
    Ok(NamedBlob {
        name,
        mime: format.mime().to_string(),
        bytes,
    })
}

/// Wraps a single file as a blob.
///
/// Binary files are decoded and keep their kind as MIME type; text files
/// are `text/plain`.
///
/// # Errors
///
/// Returns `ArchiveError::InvalidPayload` if a binary payload cannot be
/// decoded.
///
/// # Examples
///
/// ```
/// use sharetree_archive::file_blob;
/// use sharetree_store::File;
///
/// let file = File::new("pic.png", "data:image/png;base64,QUJD", "image/png");
/// let blob = file_blob(&file).unwrap();
/// assert_eq!(blob.bytes, b"ABC");
/// assert_eq!(blob.mime, "image/png");
/// ```
pub fn file_blob(file: &File) -> Result<NamedBlob> {
    let bytes = file
        .payload_bytes()
        .map_err(|source| ArchiveError::InvalidPayload {
            path: file.name().to_string(),
            source,
        })?;
    let mime = if file.kind().is_binary() {
        file.kind().as_str()
    } else {
        TEXT_MIME
    };
    Ok(NamedBlob {
        name: file.name().to_string(),
        mime: mime.to_string(),
        bytes,
    })
}

/// Produces a blob for whatever lives at `path`.
///
/// A folder becomes an archive in `format`; a file becomes its raw bytes.
///
/// # Errors
///
/// Returns `ArchiveError::ItemNotFound` if nothing exists at `path`, and
/// the errors of [`build_folder_archive`] and [`file_blob`] otherwise.
pub async fn download(
    store: &TreeStore,
    path: impl AsRef<str>,
    format: ArchiveFormat,
) -> Result<NamedBlob> {
    let path = TreePath::new(path);
    if store.resolve_path(&path).is_some() {
        return build_folder_archive(store, &path, format).await;
    }
    let file = store.file(&path).ok_or_else(|| ArchiveError::ItemNotFound {
        path: path.to_string(),
    })?;
    file_blob(file)
}
