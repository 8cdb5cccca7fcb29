//! Domain types for representing extracted slide content.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The smallest unit of styled text: a span with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Text content. Never empty once extraction has finished.
    pub text: String,

    /// Whether the run carries an explicit bold attribute.
    pub is_bold: bool,
}

impl Run {
    /// Create a plain (non-bold) run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bold: false,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bold: true,
        }
    }

    /// A run holding a single line break.
    pub fn line_break() -> Self {
        Self::new("\n")
    }

    /// Whether this run is a bare line break.
    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

/// A paragraph of styled runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Runs in document order.
    pub runs: Vec<Run>,

    /// True unless the paragraph explicitly suppresses bullets.
    pub is_list: bool,

    /// Nesting depth, 0 for top level.
    pub level: u32,
}

impl Paragraph {
    /// Create a top-level paragraph.
    pub fn new(runs: Vec<Run>, is_list: bool) -> Self {
        Self {
            runs,
            is_list,
            level: 0,
        }
    }

    /// Set the nesting level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A single normalized slide, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based number taken from the slide part name.
    pub ordinal: u32,

    /// Slide title, empty when none was found.
    pub title: String,

    /// Body paragraphs in reading order.
    pub paragraphs: Vec<Paragraph>,

    /// Package paths of referenced images, not yet decoded.
    pub images: Vec<String>,
}

impl Slide {
    /// Create an empty slide with the given ordinal.
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            title: String::new(),
            paragraphs: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Paragraph texts, in order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs.iter().map(Paragraph::text).collect()
    }
}

/// One entry of a relationship part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Relationship id, e.g. `rId2`.
    pub id: String,

    /// Relationship type URI.
    #[serde(rename = "type")]
    pub rel_type: String,

    /// Target path, raw or resolved depending on the producer.
    pub target: String,
}

/// Image encodings the renderer can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detect format from the extension of a package path.
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Category of a non-fatal extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    InvalidPartName,
    DuplicateOrdinal,
    EntryMissing,
    EntryUnreadable,
    SlideParse,
    RelationshipParse,
    UnsupportedImageType,
}

/// A skipped slide, image or part, reported alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionWarning {
    /// Package path the warning is about.
    pub part: String,

    /// Ordinal of the slide involved, if known.
    pub ordinal: Option<u32>,

    /// Warning category.
    pub kind: WarningKind,

    /// Human readable detail.
    pub message: String,
}

impl ExtractionWarning {
    /// Create a warning.
    pub fn new(
        part: impl Into<String>,
        ordinal: Option<u32>,
        kind: WarningKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            part: part.into(),
            ordinal,
            kind,
            message: message.into(),
        }
    }

    /// Downgrade an error to a warning about `part`.
    pub fn from_error(part: impl Into<String>, ordinal: Option<u32>, error: &Error) -> Self {
        Self::new(part, ordinal, error.warning_kind(), error.to_string())
    }
}

/// Result of extracting a whole package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Slides in ordinal order.
    pub slides: Vec<Slide>,

    /// Everything that was skipped along the way.
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    /// Look up a slide by its ordinal.
    pub fn slide(&self, ordinal: u32) -> Option<&Slide> {
        self.slides.iter().find(|s| s.ordinal == ordinal)
    }

    /// All image paths referenced by any slide, in slide order.
    pub fn image_paths(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.images.iter().map(String::as_str))
            .collect()
    }
}
