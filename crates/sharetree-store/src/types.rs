//! Core types for the file tree.
//!
//! This module defines the error hierarchy, the normalized [`TreePath`]
//! type and the name rules shared by every tree operation.
//!
//! # Examples
//!
//! ```
//! use sharetree_store::TreePath;
//!
//! let path = TreePath::new("/docs//drafts/");
//! assert_eq!(path.as_str(), "/docs/drafts");
//! assert_eq!(path.segments().collect::<Vec<_>>(), vec!["docs", "drafts"]);
//! ```

use std::fmt;
use thiserror::Error;

/// Errors that can occur during tree operations.
///
/// Every mutation reports failure through this type instead of panicking;
/// a rejected operation never changes the tree.
///
/// # Examples
///
/// ```
/// use sharetree_store::StoreError;
///
/// let error = StoreError::NotFound {
///     path: "/missing".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum StoreError {
    /// Nothing exists at the given path.
    #[error("Not found: {path}")]
    NotFound {
        /// The path that did not resolve
        path: String,
    },

    /// A path segment names a file where a folder was required.
    #[error("Not a folder: {path}")]
    NotAFolder {
        /// The path that names a file
        path: String,
    },

    /// A mutation was attempted while the store is read-only.
    #[error("Store is read-only, refusing to {operation}")]
    ReadOnly {
        /// The rejected operation
        operation: &'static str,
    },

    /// A node name is empty, contains a path separator, or is `.`/`..`.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why the name was rejected
        reason: &'static str,
    },

    /// Serialized state could not be parsed or has the wrong shape.
    #[error("Malformed tree state: {message}")]
    MalformedState {
        /// Description of the problem
        message: String,
        /// Underlying parse error, if any
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A share token could not be decoded.
    #[error("Invalid share token: {reason}")]
    InvalidShareToken {
        /// Why decoding failed
        reason: String,
    },

    /// A folder would be nested deeper than [`MAX_DEPTH`].
    #[error("Folder nesting at {path} exceeds {max} levels")]
    TooDeep {
        /// The deepest folder that would be created
        path: String,
        /// The nesting limit
        max: usize,
    },

    /// A move or copy would place an item inside itself.
    #[error("Invalid transfer of {source_path} into {target}")]
    InvalidTransfer {
        /// The item being moved or copied
        source_path: String,
        /// The requested destination folder
        target: String,
    },

    /// Reading external content failed.
    #[error("Failed to read {name}")]
    Io {
        /// Display name of the content source
        name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Returns `true` if a path did not resolve.
    ///
    /// Both missing segments and segments naming a file count as
    /// not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::StoreError;
    ///
    /// let error = StoreError::NotAFolder {
    ///     path: "/notes.txt".to_string(),
    /// };
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotAFolder { .. })
    }

    /// Returns `true` if this is a read-only violation.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// Returns `true` if this is an invalid name error.
    #[must_use]
    pub const fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    /// Returns `true` if a folder would exceed the nesting limit.
    #[must_use]
    pub const fn is_too_deep(&self) -> bool {
        matches!(self, Self::TooDeep { .. })
    }

    /// Returns `true` if serialized state or a share token was rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::StoreError;
    ///
    /// let error = StoreError::InvalidShareToken {
    ///     reason: "not base64".to_string(),
    /// };
    /// assert!(error.is_malformed());
    /// ```
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedState { .. } | Self::InvalidShareToken { .. }
        )
    }
}

/// A normalized slash-delimited tree path.
///
/// Construction never fails: empty segments are dropped, so `""`, `"/"`
/// and `"//"` all denote the root, and `"a/b/"` equals `"/a/b"`.
///
/// # Examples
///
/// ```
/// use sharetree_store::TreePath;
///
/// let path = TreePath::new("docs/readme");
/// assert_eq!(path.as_str(), "/docs/readme");
/// assert_eq!(path.name(), Some("readme"));
/// assert_eq!(path.parent().unwrap().as_str(), "/docs");
/// assert!(TreePath::new("/").is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(String);

impl TreePath {
    /// Creates a normalized path from any slash-delimited string.
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut normalized = String::new();
        for segment in path.as_ref().split('/').filter(|s| !s.is_empty()) {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        Self(normalized)
    }

    /// Returns the root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Number of segments; the root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Iterates over the non-empty segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the last segment, or `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Returns a new path with `name` appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreePath;
    ///
    /// assert_eq!(TreePath::root().join("docs").as_str(), "/docs");
    /// assert_eq!(TreePath::new("/docs").join("a.txt").as_str(), "/docs/a.txt");
    /// ```
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        if self.is_root() {
            Self::new(name)
        } else {
            Self::new(format!("{}/{name}", self.0))
        }
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind('/').map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Returns `true` if `self` equals `ancestor` or lies beneath it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::TreePath;
    ///
    /// let docs = TreePath::new("/docs");
    /// assert!(TreePath::new("/docs/a").is_within(&docs));
    /// assert!(docs.is_within(&docs));
    /// assert!(!TreePath::new("/docsx").is_within(&docs));
    /// ```
    #[must_use]
    pub fn is_within(&self, ancestor: &Self) -> bool {
        if ancestor.is_root() || self == ancestor {
            return true;
        }
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TreePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Deepest folder nesting a tree may hold, counted from the root.
///
/// Serialized state nests two JSON levels per folder, so this keeps every
/// storable tree inside the parser's recursion limit and export and import
/// accept the same trees.
pub const MAX_DEPTH: usize = 48;

/// Checks that `levels` nested folders fit beneath `parent`.
///
/// # Errors
///
/// Returns `StoreError::TooDeep` if the deepest folder would exceed
/// [`MAX_DEPTH`].
///
/// # Examples
///
/// ```
/// use sharetree_store::{MAX_DEPTH, TreePath, check_depth};
///
/// assert!(check_depth(&TreePath::root(), MAX_DEPTH).is_ok());
/// assert!(check_depth(&TreePath::new("/a"), MAX_DEPTH).unwrap_err().is_too_deep());
/// ```
pub fn check_depth(parent: &TreePath, levels: usize) -> Result<()> {
    let depth = parent.depth() + levels;
    if depth > MAX_DEPTH {
        return Err(StoreError::TooDeep {
            path: parent.to_string(),
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// Checks that `name` can be used as a child key.
///
/// # Errors
///
/// Returns `StoreError::InvalidName` if the name is empty, contains `/`,
/// or is `.` or `..`.
///
/// # Examples
///
/// ```
/// use sharetree_store::validate_name;
///
/// assert!(validate_name("readme.txt").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("a/b").is_err());
/// assert!(validate_name("..").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidName {
            name: String::new(),
            reason: "name is empty",
        });
    }
    if name.contains('/') {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name contains '/'",
        });
    }
    if name == "." || name == ".." {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name is a relative path component",
        });
    }
    Ok(())
}

/// Type alias for tree operation results.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_depth_boundary() {
        let path = TreePath::new(vec!["d"; MAX_DEPTH - 1].join("/"));
        assert_eq!(path.depth(), MAX_DEPTH - 1);
        assert!(check_depth(&path, 1).is_ok());
        let err = check_depth(&path, 2).unwrap_err();
        assert!(matches!(err, StoreError::TooDeep { max, .. } if max == MAX_DEPTH));
    }

    #[test]
    fn test_tree_path_normalizes() {
        assert_eq!(TreePath::new("").as_str(), "/");
        assert_eq!(TreePath::new("//").as_str(), "/");
        assert_eq!(TreePath::new("a//b/").as_str(), "/a/b");
    }

    #[test]
    fn test_tree_path_parent_chain() {
        let path = TreePath::new("/a/b/c");
        let parent = path.parent().unwrap();
        assert_eq!(parent.as_str(), "/a/b");
        assert_eq!(parent.parent().unwrap().as_str(), "/a");
        assert_eq!(parent.parent().unwrap().parent().unwrap(), TreePath::root());
        assert!(TreePath::root().parent().is_none());
    }

    #[test]
    fn test_tree_path_name() {
        assert_eq!(TreePath::new("/a/b").name(), Some("b"));
        assert_eq!(TreePath::root().name(), None);
    }

    #[test]
    fn test_tree_path_is_within() {
        let root = TreePath::root();
        assert!(TreePath::new("/x").is_within(&root));
        assert!(!TreePath::new("/a").is_within(&TreePath::new("/a/b")));
    }

    #[test]
    fn test_tree_path_display() {
        assert_eq!(format!("{}", TreePath::new("x/y")), "/x/y");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("ok").is_ok());
        assert!(validate_name("").unwrap_err().is_invalid_name());
        assert!(validate_name("/").unwrap_err().is_invalid_name());
        assert!(validate_name(".").unwrap_err().is_invalid_name());
        assert!(validate_name("...").is_ok());
    }

    #[test]
    fn test_error_classification() {
        let error = StoreError::ReadOnly {
            operation: "rename",
        };
        assert!(error.is_read_only());
        assert!(!error.is_not_found());
        assert!(!error.is_malformed());

        let error = StoreError::MalformedState {
            message: "bad".to_string(),
            source: None,
        };
        assert!(error.is_malformed());
    }
}
