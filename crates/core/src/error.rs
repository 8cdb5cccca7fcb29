//! Error types for PPTX slide extraction.

use thiserror::Error;

use crate::types::WarningKind;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during slide extraction.
///
/// Only [`Error::ArchiveCorrupt`] and [`Error::IoError`] abort a whole
/// extraction. Everything else is scoped to a single slide or image and is
/// turned into an [`crate::ExtractionWarning`] by the slide assembler.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The input is not a readable zip container.
    #[error("Invalid or corrupted package: {0}")]
    ArchiveCorrupt(String),

    /// A named entry does not exist in the package.
    #[error("Entry not found in package: {0}")]
    EntryMissing(String),

    /// An entry exists but could not be decompressed or decoded.
    #[error("Failed to read entry '{path}': {reason}")]
    EntryUnreadable { path: String, reason: String },

    /// A slide part is not well-formed XML.
    #[error("Slide parsing error: {0}")]
    SlideParseError(String),

    /// A relationship part is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// An image reference points at a format the renderer cannot decode.
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// A part path looked like a slide part but its number is unusable.
    #[error("Invalid part name: {0}")]
    InvalidPartName(String),
}

impl Error {
    /// Whether this error aborts the whole extraction rather than one slide.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ArchiveCorrupt(_) | Error::IoError(_))
    }

    /// The warning category used when this error is downgraded to a skip.
    pub fn warning_kind(&self) -> WarningKind {
        match self {
            Error::EntryMissing(_) => WarningKind::EntryMissing,
            Error::EntryUnreadable { .. } | Error::IoError(_) | Error::ArchiveCorrupt(_) => {
                WarningKind::EntryUnreadable
            }
            Error::SlideParseError(_) => WarningKind::SlideParse,
            Error::XmlError(_) => WarningKind::RelationshipParse,
            Error::UnsupportedImageType(_) => WarningKind::UnsupportedImageType,
            Error::InvalidPartName(_) => WarningKind::InvalidPartName,
        }
    }
}
