//! Tar packaging with optional zstd compression.

use crate::entry::ArchiveEntry;
use crate::error::{ArchiveError, Result};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tar::{Builder, EntryType, Header};

/// zstd level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Container format for folder archives.
///
/// # Examples
///
/// ```
/// use sharetree_archive::ArchiveFormat;
///
/// let format: ArchiveFormat = "tar.zst".parse().unwrap();
/// assert_eq!(format.extension(), "tar.zst");
/// assert_eq!(ArchiveFormat::default().extension(), "tar");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    /// Plain uncompressed tar
    #[default]
    Tar,
    /// Tar compressed with zstd
    TarZst {
        /// zstd compression level
        level: i32,
    },
}

impl ArchiveFormat {
    /// File extension, without the leading dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarZst { .. } => "tar.zst",
        }
    }

    /// MIME type of the packed archive.
    #[must_use]
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Tar => "application/x-tar",
            Self::TarZst { .. } => "application/zstd",
        }
    }

    /// Returns this format with `level` applied when it is compressed.
    #[must_use]
    pub const fn with_level(self, level: i32) -> Self {
        match self {
            Self::Tar => Self::Tar,
            Self::TarZst { .. } => Self::TarZst { level },
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tar" => Ok(Self::Tar),
            "tar.zst" | "zst" => Ok(Self::TarZst {
                level: DEFAULT_COMPRESSION_LEVEL,
            }),
            _ => Err(format!(
                "invalid archive format: '{s}' (expected: tar or tar.zst)"
            )),
        }
    }
}

/// Packs `entries` into an archive of the given format.
///
/// Entries are regular files with mode `0644` and a zero mtime, so the
/// same tree always packs to the same bytes.
///
/// # Errors
///
/// Returns `ArchiveError::Write` if an entry cannot be appended (for
/// example a path the tar format rejects) or compression fails.
///
/// # Examples
///
/// ```
/// use sharetree_archive::{ArchiveEntry, ArchiveFormat, pack};
///
/// let entries = vec![ArchiveEntry { path: "a.txt".to_string(), data: b"hi".to_vec() }];
/// let bytes = pack(&entries, ArchiveFormat::Tar).unwrap();
///
/// let mut archive = tar::Archive::new(bytes.as_slice());
/// assert_eq!(archive.entries().unwrap().count(), 1);
/// ```
pub fn pack(entries: &[ArchiveEntry], format: ArchiveFormat) -> Result<Vec<u8>> {
    match format {
        ArchiveFormat::Tar => write_tar(Vec::new(), entries),
        ArchiveFormat::TarZst { level } => {
            let encoder = zstd::Encoder::new(Vec::new(), level).map_err(finish_error)?;
            let encoder = write_tar(encoder, entries)?;
            encoder.finish().map_err(finish_error)
        }
    }
}

fn write_tar<W: Write>(writer: W, entries: &[ArchiveEntry]) -> Result<W> {
    let mut builder = Builder::new(writer);
    for entry in entries {
        add_file(&mut builder, &entry.path, &entry.data)?;
    }
    builder.into_inner().map_err(finish_error)
}

fn add_file<W: Write>(builder: &mut Builder<W>, path: &str, data: &[u8]) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);

    // append_data writes a long-name record for paths over 100 bytes
    builder
        .append_data(&mut header, path, data)
        .map_err(|source| ArchiveError::Write {
            path: path.to_string(),
            source,
        })
}

fn finish_error(source: std::io::Error) -> ArchiveError {
    ArchiveError::Write {
        path: "<archive>".to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry {
                path: "a.txt".to_string(),
                data: b"alpha".to_vec(),
            },
            ArchiveEntry {
                path: "nested/b.bin".to_string(),
                data: vec![0, 1, 2, 255],
            },
        ]
    }

    fn read_back(bytes: &[u8]) -> Vec<(String, Vec<u8>, u32)> {
        let mut archive = tar::Archive::new(bytes);
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let path = entry.path().unwrap().to_string_lossy().into_owned();
                let mode = entry.header().mode().unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (path, data, mode)
            })
            .collect()
    }

    #[test]
    fn test_tar_entries() {
        let bytes = pack(&sample(), ArchiveFormat::Tar).unwrap();
        let entries = read_back(&bytes);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a.txt");
        assert_eq!(entries[0].1, b"alpha");
        assert_eq!(entries[0].2, 0o644);
        assert_eq!(entries[1].0, "nested/b.bin");
        assert_eq!(entries[1].1, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_tar_zst_roundtrip() {
        let bytes = pack(&sample(), ArchiveFormat::TarZst { level: 5 }).unwrap();
        let tar_bytes = zstd::decode_all(bytes.as_slice()).unwrap();
        assert_eq!(read_back(&tar_bytes).len(), 2);
    }

    #[test]
    fn test_packing_is_deterministic() {
        let first = pack(&sample(), ArchiveFormat::Tar).unwrap();
        let second = pack(&sample(), ArchiveFormat::Tar).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_paths() {
        let path = format!("{}/file.txt", "d".repeat(150));
        let entries = vec![ArchiveEntry {
            path: path.clone(),
            data: b"x".to_vec(),
        }];
        let bytes = pack(&entries, ArchiveFormat::Tar).unwrap();
        assert_eq!(read_back(&bytes)[0].0, path);
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = pack(&[], ArchiveFormat::Tar).unwrap();
        assert!(read_back(&bytes).is_empty());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("TAR".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Tar);
        assert_eq!(
            "zst".parse::<ArchiveFormat>().unwrap(),
            ArchiveFormat::TarZst {
                level: DEFAULT_COMPRESSION_LEVEL
            }
        );
        assert!("zip".parse::<ArchiveFormat>().is_err());
        assert_eq!(
            ArchiveFormat::TarZst { level: 1 }.with_level(9),
            ArchiveFormat::TarZst { level: 9 }
        );
        assert_eq!(ArchiveFormat::Tar.with_level(9), ArchiveFormat::Tar);
    }
}
