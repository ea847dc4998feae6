//! Archive building for sharetree folders.
//!
//! Walks a folder of a [`TreeStore`](sharetree_store::TreeStore), decodes
//! every file to the bytes it represents and packs the result into a tar
//! archive, optionally zstd-compressed. Single files become raw blobs.
//!
//! # Examples
//!
//! ```
//! use sharetree_archive::{ArchiveFormat, build_folder_archive};
//! use sharetree_store::TreeStore;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut store = TreeStore::new();
//! store.create_folder("/", "photos").unwrap();
//! store
//!     .create_file("/photos", "dot.png", "data:image/png;base64,QUJD", "image/png")
//!     .unwrap();
//!
//! let blob = build_folder_archive(&store, "/photos", ArchiveFormat::Tar)
//!     .await
//!     .unwrap();
//! assert_eq!(blob.name, "photos.tar");
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod blob;
mod entry;
mod error;
mod pack;

pub use blob::{NamedBlob, build_folder_archive, download, file_blob};
pub use entry::{ArchiveEntry, collect_entries};
pub use error::{ArchiveError, Result};
pub use pack::{ArchiveFormat, DEFAULT_COMPRESSION_LEVEL, pack};
