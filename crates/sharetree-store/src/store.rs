//! The tree store.
//!
//! [`TreeStore`] owns exactly one root folder and performs every structural
//! mutation on it. Mutations report failure through [`StoreError`] and are
//! single insert/remove steps on one folder, so a rejected call leaves the
//! tree untouched.
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
//! let docs = store.resolve_path("/docs").unwrap();
//! assert_eq!(docs.file("readme.txt").unwrap().content(), "hello");
//! ```

use crate::codec;
use crate::node::{ContentKind, File, Folder, Node};
use crate::share;
use crate::types::{Result, StoreError, TreePath, check_depth, validate_name};
use tracing::{debug, warn};

/// Name given to the root folder of every new tree.
pub const ROOT_NAME: &str = "root";

/// An in-memory hierarchical file store.
///
/// The store is single-owner: callers serialize their calls, and every
/// operation takes an explicit path rather than a "current location".
///
/// # Examples
///
/// ```
/// use sharetree_store::TreeStore;
///
/// let mut store = TreeStore::new();
/// store.set_read_only(true);
///
/// let result = store.create_folder("/", "docs");
/// assert!(result.unwrap_err().is_read_only());
/// assert!(store.root().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TreeStore {
    root: Folder,
    read_only: bool,
}

impl TreeStore {
    /// Creates a store holding an empty root folder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Folder::new(ROOT_NAME),
            read_only: false,
        }
    }

    /// Creates a writable store from serialized state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MalformedState` if the text is not a valid tree.
    pub fn from_state(text: &str) -> Result<Self> {
        let mut store = Self::new();
        store.import_state(text)?;
        Ok(store)
    }

    /// Opens a share token as a read-only store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidShareToken` if the token cannot be decoded,
    /// or `StoreError::MalformedState` if the decoded state is not a tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_folder("/", "photos").unwrap();
    /// let token = store.share_token().unwrap();
    ///
    /// let shared = TreeStore::open_shared(&token).unwrap();
    /// assert!(shared.is_read_only());
    /// assert!(shared.resolve_path("/photos").is_some());
    /// ```
    pub fn open_shared(token: &str) -> Result<Self> {
        let state = share::decode_token(token)?;
        let mut store = Self::from_state(&state)?;
        store.set_read_only(true);
        Ok(store)
    }

    /// Returns the root folder.
    #[must_use]
    pub const fn root(&self) -> &Folder {
        &self.root
    }

    /// Resolves a path to a folder.
    ///
    /// `"/"` returns the root. Any missing segment, or any segment naming a
    /// file, yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_folder("/", "a").unwrap();
    /// store.create_file("/a", "f.txt", "", "").unwrap();
    ///
    /// assert!(store.resolve_path("/a").is_some());
    /// assert!(store.resolve_path("/a/f.txt").is_none());
    /// assert!(store.resolve_path("/missing").is_none());
    /// ```
    #[must_use]
    pub fn resolve_path(&self, path: impl AsRef<str>) -> Option<&Folder> {
        self.locate(&TreePath::new(path)).ok()
    }

    /// Resolves a path to a folder, reporting why resolution failed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for a missing segment and
    /// `StoreError::NotAFolder` for a segment naming a file.
    pub fn locate(&self, path: &TreePath) -> Result<&Folder> {
        let mut current = &self.root;
        let mut walked = TreePath::root();
        for segment in path.segments() {
            walked = walked.join(segment);
            current = match current.child(segment) {
                Some(Node::Folder(folder)) => folder,
                Some(Node::File(_)) => {
                    return Err(StoreError::NotAFolder {
                        path: walked.to_string(),
                    });
                }
                None => {
                    return Err(StoreError::NotFound {
                        path: walked.to_string(),
                    });
                }
            };
        }
        Ok(current)
    }

    /// Returns the file at `path`, if the path names a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_file("/", "a.txt", "x", "text/plain").unwrap();
    ///
    /// assert_eq!(store.file("/a.txt").unwrap().content(), "x");
    /// assert!(store.file("/").is_none());
    /// ```
    #[must_use]
    pub fn file(&self, path: impl AsRef<str>) -> Option<&File> {
        let path = TreePath::new(path);
        let name = path.name()?;
        self.locate(&path.parent()?).ok()?.file(name)
    }

    /// Creates an empty folder under `parent`.
    ///
    /// An existing child with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Fails if the store is read-only, `parent` does not resolve to a
    /// folder, `name` is invalid, or the folder would be nested deeper than
    /// [`MAX_DEPTH`](crate::MAX_DEPTH).
    pub fn create_folder(&mut self, parent: impl AsRef<str>, name: &str) -> Result<()> {
        let folder = self.writable_folder("create folder", parent.as_ref())?;
        validate_name(name)?;
        check_depth(&TreePath::new(parent.as_ref()), 1)?;
        folder.insert(Node::Folder(Folder::new(name)));
        debug!(parent = parent.as_ref(), name, "created folder");
        Ok(())
    }

    /// Creates a file under `parent`.
    ///
    /// An existing child with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Fails if the store is read-only, `parent` does not resolve to a
    /// folder, or `name` is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_file("/", "pic.png", "data:image/png;base64,QUJD", "image/png").unwrap();
    ///
    /// let pic = store.file("/pic.png").unwrap();
    /// assert!(pic.kind().is_binary());
    /// assert!(store.create_file("/nope", "a", "", "").is_err());
    /// ```
    pub fn create_file(
        &mut self,
        parent: impl AsRef<str>,
        name: &str,
        content: impl Into<String>,
        kind: impl Into<ContentKind>,
    ) -> Result<()> {
        let folder = self.writable_folder("create file", parent.as_ref())?;
        validate_name(name)?;
        folder.insert(Node::File(File::new(name, content, kind)));
        debug!(parent = parent.as_ref(), name, "created file");
        Ok(())
    }

    /// Creates a file with empty content and an empty kind.
    ///
    /// # Errors
    ///
    /// Same as [`TreeStore::create_file`].
    pub fn create_empty_file(&mut self, parent: impl AsRef<str>, name: &str) -> Result<()> {
        self.create_file(parent, name, String::new(), ContentKind::default())
    }

    /// Renames the child `old` of `parent` to `new`.
    ///
    /// The node keeps its content or subtree. If `new` already names a
    /// child, that child is overwritten and the renamed node takes its
    /// position. Renaming to the same name is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if the store is read-only, `parent` does not resolve, `old` is
    /// absent, or `new` is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_file("/", "a", "first", "").unwrap();
    /// store.create_file("/", "b", "second", "").unwrap();
    ///
    /// store.rename("/", "a", "b").unwrap();
    /// assert_eq!(store.root().len(), 1);
    /// assert_eq!(store.file("/b").unwrap().content(), "first");
    /// ```
    pub fn rename(&mut self, parent: impl AsRef<str>, old: &str, new: &str) -> Result<()> {
        let parent = TreePath::new(parent);
        let folder = self.writable_folder("rename", parent.as_str())?;
        if folder.child(old).is_none() {
            return Err(StoreError::NotFound {
                path: parent.join(old).to_string(),
            });
        }
        validate_name(new)?;
        if old == new {
            return Ok(());
        }
        if let Some(mut node) = folder.remove(old) {
            node.set_name(new.to_string());
            folder.insert(node);
        }
        debug!(parent = %parent, old, new, "renamed node");
        Ok(())
    }

    /// Puts back a root saved before a multi-step mutation failed.
    pub(crate) fn restore_root(&mut self, root: Folder) {
        self.root = root;
    }

    /// Detaches the child `name` of `parent` and returns it.
    pub(crate) fn remove(&mut self, parent: &TreePath, name: &str) -> Result<Node> {
        let folder = self.writable_folder("remove", parent.as_str())?;
        folder.remove(name).ok_or_else(|| StoreError::NotFound {
            path: parent.join(name).to_string(),
        })
    }

    /// Enables or disables read-only mode.
    pub const fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns `true` if mutations are currently rejected.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Serializes the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MalformedState` if serialization fails.
    pub fn export_state(&self) -> Result<String> {
        codec::encode_tree(&self.root)
    }

    /// Replaces the whole tree with parsed state.
    ///
    /// The text is fully parsed and checked before the swap; on failure the
    /// current tree is kept and the error is logged and returned. The
    /// read-only flag is not changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MalformedState` if the text is not a valid tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_folder("/", "keep").unwrap();
    ///
    /// assert!(store.import_state("{not json").is_err());
    /// assert!(store.resolve_path("/keep").is_some());
    /// ```
    pub fn import_state(&mut self, text: &str) -> Result<()> {
        match codec::decode_tree(text) {
            Ok(root) => {
                self.root = root;
                debug!(files = self.root.file_count(), "imported tree state");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to import tree state");
                Err(e)
            }
        }
    }

    /// Exports the tree and wraps it in a URL-safe share token.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn share_token(&self) -> Result<String> {
        Ok(share::encode_token(&self.export_state()?))
    }

    fn writable_folder(&mut self, operation: &'static str, parent: &str) -> Result<&mut Folder> {
        if self.read_only {
            return Err(StoreError::ReadOnly { operation });
        }
        let path = TreePath::new(parent);
        // Resolve immutably first so the error carries the failing prefix.
        self.locate(&path)?;
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current
                .folder_mut(segment)
                .ok_or_else(|| StoreError::NotFound {
                    path: path.to_string(),
                })?;
        }
        Ok(current)
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}
