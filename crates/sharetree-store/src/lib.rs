//! In-memory hierarchical file store.
//!
//! Provides a tree of named folders and files addressed by slash-delimited
//! paths, with whole-tree serialization and read-only share tokens.
//!
//! # Features
//!
//! - **Tree store**: path resolution, create, rename and a read-only mode
//! - **State codec**: lossless JSON export/import with all-or-nothing import
//! - **Share tokens**: URL-embeddable encoding of exported state
//! - **Transfer**: move/copy of files and whole folders
//! - **Ingestion**: batch import of external content with per-item failures
//!
//! # Examples
//!
//! ```
//! use sharetree_store::TreeStore;
//!
//! let mut store = TreeStore::new();
//! store.create_folder("/", "docs").unwrap();
//! store.create_file("/docs", "readme.txt", "hello", "text/plain").unwrap();
//!
//! let mut copy = TreeStore::new();
//! copy.import_state(&store.export_state().unwrap()).unwrap();
//!
//! let docs = copy.resolve_path("/docs").unwrap();
//! assert_eq!(docs.file("readme.txt").unwrap().content(), "hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod codec;
pub mod ingest;
pub mod node;
pub mod share;
pub mod store;
pub mod transfer;
pub mod types;

pub use node::{ContentKind, File, Folder, Node};
pub use store::{ROOT_NAME, TreeStore};
pub use types::{MAX_DEPTH, Result, StoreError, TreePath, check_depth, validate_name};
