//! Configuration for the sharetree CLI.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/sharetree/config.toml`
//! - macOS: `~/Library/Application Support/sharetree/config.toml`
//! - Windows: `%APPDATA%\sharetree\config.toml`
//!
//! A missing file is not an error: every section falls back to its
//! defaults, and so does every missing key.
//!
//! # Examples
//!
//! ```
//! use sharetree_core::config::Config;
//!
//! let config: Config = toml::from_str(
//!     r#"
//!     [archive]
//!     format = "tar.zst"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.archive.format, "tar.zst");
//! assert_eq!(config.share.query_param, "share");
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "sharetree";

const VALID_FORMATS: [&str; 3] = ["json", "text", "pretty"];
const VALID_ARCHIVE_FORMATS: [&str; 2] = ["tar", "tar.zst"];

/// CLI configuration.
///
/// ```toml
/// [general]
/// state_file = "~/.local/share/sharetree/state.json"
/// default_format = "pretty"
///
/// [share]
/// base_url = "https://sharetree.local/"
/// query_param = "share"
///
/// [archive]
/// format = "tar"
/// compression_level = 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Share link settings
    #[serde(default)]
    pub share: ShareConfig,

    /// Archive settings
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tree state file; `~/` expands to the home directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<String>,

    /// Default output format (json, text, pretty)
    pub default_format: String,
}

/// Share link configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    /// Base URL share links are built on
    pub base_url: String,

    /// Query parameter that carries the token
    pub query_param: String,
}

/// Archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Archive format for folders (tar, tar.zst)
    pub format: String,

    /// zstd compression level, used by `tar.zst`
    pub compression_level: i32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            default_format: "pretty".to_string(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sharetree.local/".to_string(),
            query_param: "share".to_string(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            format: "tar".to_string(),
            compression_level: 3,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the platform has no config directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| Error::ConfigError {
            message: "failed to determine config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads configuration from `path`, or returns defaults if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Writes configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = self.to_toml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, toml_str).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Renders the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|source| Error::ConfigSerialize { source })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if !VALID_FORMATS.contains(&self.general.default_format.as_str()) {
            return Err(invalid(format!(
                "invalid general.default_format '{}', must be one of: {}",
                self.general.default_format,
                VALID_FORMATS.join(", ")
            )));
        }

        if self.share.query_param.is_empty() {
            return Err(invalid("share.query_param cannot be empty".to_string()));
        }

        if !VALID_ARCHIVE_FORMATS.contains(&self.archive.format.as_str()) {
            return Err(invalid(format!(
                "invalid archive.format '{}', must be one of: {}",
                self.archive.format,
                VALID_ARCHIVE_FORMATS.join(", ")
            )));
        }

        if !(1..=22).contains(&self.archive.compression_level) {
            return Err(invalid(format!(
                "archive.compression_level must be between 1 and 22, got {}",
                self.archive.compression_level
            )));
        }

        Ok(())
    }

    /// Returns the tree state file to use.
    ///
    /// Uses `general.state_file` when set, otherwise `state.json` in the
    /// platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if no data directory can be determined.
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.general.state_file {
            return Ok(expand_home(path));
        }
        let data_dir = dirs::data_dir().ok_or_else(|| Error::ConfigError {
            message: "failed to determine data directory".to_string(),
        })?;
        Ok(data_dir.join(APP_DIR).join("state.json"))
    }
}

fn invalid(message: String) -> Error {
    Error::ConfigError { message }
}

/// Expands a leading `~/` to the home directory.
///
/// Paths without the prefix, or when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use sharetree_core::config::expand_home;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_home("/var/tree.json"), PathBuf::from("/var/tree.json"));
/// ```
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.default_format, "pretty");
        assert_eq!(config.archive.compression_level, 3);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.general.state_file = Some("/srv/tree.json".to_string());
        config.archive.format = "tar.zst".to_string();

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.state_path().unwrap(), PathBuf::from("/srv/tree.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[share]\nbase_url = \"https://x.test/\"\n").unwrap();
        assert_eq!(config.share.base_url, "https://x.test/");
        assert_eq!(config.share.query_param, "share");
        assert_eq!(config.archive, ArchiveConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.archive.format = "zip".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        let mut config = Config::default();
        config.archive.compression_level = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.default_format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.share.query_param.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[archive\nformat = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_to_toml_omits_unset_state_file() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(!rendered.contains("state_file"));
        assert!(rendered.contains("[archive]"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("relative.json"), PathBuf::from("relative.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/t.json"), home.join("t.json"));
        }
    }
}
