//! Read-only access to the entries of an OOXML zip package.

use slides_core::{Error, ImageFormat, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// An opened presentation package.
///
/// Entries are decompressed on demand; nothing is written back.
pub struct Package<R> {
    archive: ZipArchive<R>,
}

impl Package<Cursor<Vec<u8>>> {
    /// Open a package held entirely in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::open(Cursor::new(bytes.into()))
    }
}

impl Package<BufReader<File>> {
    /// Open a package file on disk.
    ///
    /// Fails with [`Error::IoError`] if the file cannot be opened and with
    /// [`Error::ArchiveCorrupt`] if it is not a zip container.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Open a package from a seekable reader.
    ///
    /// Fails with [`Error::ArchiveCorrupt`] if the input is not a zip container.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ArchiveCorrupt(format!("Failed to open ZIP: {}", e)))?;
        log::debug!("Opened package with {} entries", archive.len());
        Ok(Self { archive })
    }

    /// Number of entries in the package.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the package has no entries.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// All entry names, in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    /// Entry names starting with `prefix`, sorted.
    pub fn list_entries(&self, prefix: &str) -> BTreeSet<String> {
        self.archive
            .file_names()
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    /// Whether an entry with this exact name exists.
    pub fn contains(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// Read an entry as UTF-8 text, dropping a leading byte order mark.
    pub fn read_text(&mut self, path: &str) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::EntryUnreadable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        match text.strip_prefix('\u{feff}') {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(text),
        }
    }

    /// Read the raw bytes of an entry.
    pub fn read_bytes(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::EntryMissing(path.to_string()),
            other => Error::EntryUnreadable {
                path: path.to_string(),
                reason: other.to_string(),
            },
        })?;

        // Declared sizes come from the zip headers and are not trusted.
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| Error::EntryUnreadable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        Ok(content)
    }

    /// Read an image entry, checking that its format is one we can decode.
    pub fn read_image(&mut self, path: &str) -> Result<(ImageFormat, Vec<u8>)> {
        let format = ImageFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedImageType(path.to_string()))?;
        let bytes = self.read_bytes(path)?;
        Ok((format, bytes))
    }
}
