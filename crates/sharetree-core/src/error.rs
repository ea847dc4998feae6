//! Error types shared by the sharetree front ends.
//!
//! Tree and archive operations have their own error enums in their crates;
//! this type covers configuration and argument handling.
//!
//! # Examples
//!
//! ```
//! use sharetree_core::{Error, Result};
//!
//! fn check_level(level: i32) -> Result<()> {
//!     if !(1..=22).contains(&level) {
//!         return Err(Error::ConfigError {
//!             message: format!("compression level {level} out of range"),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_level(40).unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharetree configuration and CLI handling.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is invalid.
    ///
    /// Raised when a configuration value is out of range or names an
    /// unknown option.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse config file {}", path.display())]
    ConfigParse {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be rendered as TOML.
    #[error("Failed to serialize config")]
    ConfigSerialize {
        /// Underlying TOML error
        #[source]
        source: toml::ser::Error,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// File involved in the failed operation
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// Parse and serialization failures count as configuration errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "bad value".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::ConfigParse { .. } | Self::ConfigSerialize { .. }
        )
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Type alias for results using the sharetree core error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "Invalid configuration".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_io_error());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let source = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let err = Error::ConfigParse {
            path: PathBuf::from("/tmp/config.toml"),
            source,
        };
        assert!(err.is_config_error());
        assert!(format!("{err}").contains("/tmp/config.toml"));
    }

    #[test]
    fn test_io_error_detection() {
        let err = Error::Io {
            path: PathBuf::from("state.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.is_io_error());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidArgument("unknown format".to_string());
        assert_eq!(format!("{err}"), "Invalid argument: unknown format");
        assert!(err.is_invalid_argument());
    }
}
