//! Error types for archive building.

use thiserror::Error;

/// Errors that can occur while building an archive or blob.
///
/// # Examples
///
/// ```
/// use sharetree_archive::ArchiveError;
///
/// let error = ArchiveError::FolderNotFound {
///     path: "/missing".to_string(),
/// };
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive source does not resolve to a folder.
    ///
    /// Kept apart from an empty archive: an existing folder with no files
    /// produces a valid archive with no entries.
    #[error("Folder not found: {path}")]
    FolderNotFound {
        /// The requested path
        path: String,
    },

    /// Nothing exists at the requested path.
    #[error("Item not found: {path}")]
    ItemNotFound {
        /// The requested path
        path: String,
    },

    /// A binary file's payload is not valid base64.
    #[error("Invalid binary payload in {path}")]
    InvalidPayload {
        /// Archive path of the offending file
        path: String,
        /// Underlying decode error
        #[source]
        source: base64::DecodeError,
    },

    /// Writing the tar stream or compressing it failed.
    #[error("Failed to write archive entry {path}")]
    Write {
        /// Entry being written, or the archive name when finishing
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The blocking packing task did not complete.
    #[error("Archive task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl ArchiveError {
    /// Returns `true` if the requested folder or item does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FolderNotFound { .. } | Self::ItemNotFound { .. })
    }

    /// Returns `true` if a stored payload could not be decoded.
    #[must_use]
    pub const fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::InvalidPayload { .. })
    }
}

/// Type alias for archive results.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_invalid_payload_detection() {
        let source = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err();
        let error = ArchiveError::InvalidPayload {
            path: "pic.png".to_string(),
            source,
        };
        assert!(error.is_invalid_payload());
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "Invalid binary payload in pic.png");
    }

    #[test]
    fn test_not_found_detection() {
        let error = ArchiveError::ItemNotFound {
            path: "/x".to_string(),
        };
        assert!(error.is_not_found());
    }
}
