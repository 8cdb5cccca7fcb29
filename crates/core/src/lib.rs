//! Core slide types, error taxonomy, extraction options and text
//! normalization for PPTX slide extraction.

pub mod error;
pub mod normalize;
pub mod options;
pub mod types;

pub use error::{Error, Result};
pub use normalize::{capitalize_lead, merge_adjacent, TextNormalizer};
pub use options::{ExtractOptions, TitleStrategy};
pub use types::{
    Extraction, ExtractionWarning, ImageFormat, Paragraph, Relationship, Run, Slide, WarningKind,
};
